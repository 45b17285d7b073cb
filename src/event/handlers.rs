use crate::event::{CanvasEvent, EventHandler};

/// Writes every canvas event to the `log` facade
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn handle_event(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::ImageSaved { path } => log::info!("Image saved to {}", path.display()),
            CanvasEvent::PresetInstalled { name, .. } => log::info!("Preset installed: {name}"),
            other => log::debug!("Canvas event: {other:?}"),
        }
    }
}
