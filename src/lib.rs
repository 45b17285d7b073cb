#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod bitmap;
pub mod canvas;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod input;
pub mod loader;
pub mod preset;
pub mod slider;
pub mod texture_manager;
pub mod toast;

pub use app::CanvasApp;
pub use bitmap::Bitmap;
pub use canvas::{Canvas, EguiCanvas, PaintStyle, RecordingCanvas};
pub use config::CanvasConfig;
pub use coordinator::{PanelController, PanelHandle, RenderCoordinator};
pub use error::{CanvasError, CanvasResult};
pub use history::{HistoryModel, ImageStateModel};
pub use input::TouchEvent;
pub use loader::{ImageLoader, LoaderHandle, MemoryLoader, ViewId};
pub use preset::{FilterHandle, FilterKind, ImageFilter, ImagePreset, PresetHandle};
pub use slider::{SliderController, SliderListener};
pub use toast::Toast;
