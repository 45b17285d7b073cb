use std::path::PathBuf;

/// Notifications the canvas broadcasts after it has changed its own state.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The current filter received a new parameter
    ParameterChanged { value: i32 },
    PresetInstalled {
        name: String,
        added_to_history: bool,
    },
    /// A history entry was copied back onto the canvas
    HistorySelected { index: usize },
    ToastShown { message: String, important: bool },
    ToastHidden,
    ImageSaved { path: PathBuf },
}
