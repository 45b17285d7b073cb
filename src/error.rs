use thiserror::Error;

/// Errors surfaced at the fallible edges of the canvas: decoding, config and saving.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("No source image is loaded")]
    NoImage,

    #[error("No preset is installed")]
    NoPreset,
}

/// Result type for canvas operations that can fail
pub type CanvasResult<T> = Result<T, CanvasError>;
