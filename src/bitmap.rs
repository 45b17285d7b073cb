use std::sync::Arc;

use egui::{ColorImage, Vec2};
use image::RgbaImage;
use uuid::Uuid;

/// Immutable RGBA bitmap shared between the loader, the coordinator and the texture cache.
///
/// Cloning is cheap: the pixels live behind an `Arc` and the id travels with them, so the
/// texture cache can recognise the same bitmap across frames.
#[derive(Clone)]
pub struct Bitmap {
    id: Uuid,
    pixels: Arc<RgbaImage>,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            pixels: Arc::new(pixels),
        }
    }

    /// Creates a bitmap filled with a single color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Width over height; zero-height bitmaps report a square ratio.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height() == 0 {
            return 1.0;
        }
        self.width() as f32 / self.height() as f32
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
