use std::path::Path;

use eframe::egui;

use crate::bitmap::Bitmap;
use crate::error::CanvasResult;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff"];

/// Decodes an encoded image into a bitmap
pub fn decode_bitmap(bytes: &[u8]) -> CanvasResult<Bitmap> {
    let img = image::load_from_memory(bytes)?;
    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());
    Ok(Bitmap::new(img.to_rgba8()))
}

pub fn load_bitmap(path: &Path) -> CanvasResult<Bitmap> {
    log::info!("Loading image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_bitmap(&bytes)
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Picks up images dropped onto the window.
///
/// egui reports each drop in exactly one frame, so dropping the same file again
/// reloads it.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns the first file dropped this frame that decodes as an image.
    pub fn take_dropped_image(&self, ctx: &egui::Context) -> Option<Bitmap> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let file_name = match (&file.path, file.name.is_empty()) {
                (Some(path), _) => path.display().to_string(),
                (None, false) => file.name.clone(),
                (None, true) => "unknown".to_owned(),
            };
            let result = if let Some(bytes) = &file.bytes {
                decode_bitmap(bytes)
            } else if let Some(path) = file.path.as_deref().filter(|p| is_image_path(p)) {
                load_bitmap(path)
            } else {
                log::warn!("Dropped file is not a supported type: {file_name}");
                continue;
            };

            match result {
                Ok(bitmap) => return Some(bitmap),
                Err(err) => log::error!("Failed to load dropped image {file_name}: {err}"),
            }
        }
        None
    }

    /// Dims the window and lists the files being dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
