use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use image::{Rgba, RgbaImage, imageops};
use uuid::Uuid;

use crate::bitmap::Bitmap;
use crate::error::{CanvasError, CanvasResult};
use crate::preset::ImagePreset;

/// Identifies a view that bitmaps are rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

/// Supplies the bitmaps a canvas draws and persists the final result.
///
/// Implementations decide how rendering and caching work; a view only asks
/// for what it needs each frame. `None` from `image_for_preset` means no fresh
/// result is ready yet, not an error.
pub trait ImageLoader {
    fn image_for_preset(
        &mut self,
        target: ViewId,
        preset: &ImagePreset,
        want_high_res: bool,
    ) -> Option<Bitmap>;

    /// The unfiltered source image
    fn original_bitmap(&self) -> Option<Bitmap>;

    /// Backdrop drawn behind the image, sized for the display density
    fn background_bitmap(&mut self, pixels_per_point: f32) -> Option<Bitmap>;

    /// Drops any cached result for `preset` so the next request recomputes it
    fn reset_image_for_preset(&mut self, preset: &ImagePreset, target: ViewId);

    fn save_image(&mut self, preset: &ImagePreset, destination: &Path) -> CanvasResult<()>;

    fn register_listener(&mut self, target: ViewId);
}

/// Shared loader handle; one loader usually serves several views.
pub type LoaderHandle = Rc<RefCell<dyn ImageLoader>>;

/// Applies a preset to source pixels
pub type RenderFn = Box<dyn Fn(&RgbaImage, &ImagePreset) -> RgbaImage>;

const DEFAULT_PREVIEW_SIDE: u32 = 1024;
const CHECKER_TILE: f32 = 16.0;
const CHECKER_TILES: u32 = 8;

/// In-memory loader holding one source image and a per-view result cache.
///
/// Results are computed synchronously on the first request after a reset.
/// Low-resolution requests render from a downscaled copy of the source. Each
/// view keeps at most one result per resolution: asking for a different preset
/// replaces the view's previous result.
pub struct MemoryLoader {
    original: Option<Bitmap>,
    preview: Option<Bitmap>,
    preview_max_side: u32,
    render: RenderFn,
    /// Last rendered result by (view, high resolution), tagged with its preset id
    cache: HashMap<(ViewId, bool), (Uuid, Bitmap)>,
    listeners: Vec<ViewId>,
}

impl Default for MemoryLoader {
    fn default() -> Self {
        Self {
            original: None,
            preview: None,
            preview_max_side: DEFAULT_PREVIEW_SIDE,
            render: Box::new(|source, _| source.clone()),
            cache: HashMap::new(),
            listeners: Vec::new(),
        }
    }
}

impl MemoryLoader {
    pub fn new(original: Bitmap) -> Self {
        let mut loader = Self::default();
        loader.set_original(original);
        loader
    }

    /// Replaces the function used to apply presets
    pub fn with_renderer(
        mut self,
        render: impl Fn(&RgbaImage, &ImagePreset) -> RgbaImage + 'static,
    ) -> Self {
        self.render = Box::new(render);
        self.cache.clear();
        self
    }

    pub fn with_preview_max_side(mut self, side: u32) -> Self {
        self.preview_max_side = side.max(1);
        self.rebuild_preview();
        self
    }

    /// Swaps the source image and forgets every cached result.
    pub fn set_original(&mut self, original: Bitmap) {
        log::info!(
            "Loader source set to {}x{}",
            original.width(),
            original.height()
        );
        self.original = Some(original);
        self.cache.clear();
        self.rebuild_preview();
    }

    pub fn listeners(&self) -> &[ViewId] {
        &self.listeners
    }

    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    fn rebuild_preview(&mut self) {
        self.preview = self.original.as_ref().map(|original| {
            let (w, h) = (original.width(), original.height());
            let longest = w.max(h);
            if longest <= self.preview_max_side {
                return original.clone();
            }
            let scale = self.preview_max_side as f32 / longest as f32;
            let (pw, ph) = (
                ((w as f32 * scale).round() as u32).max(1),
                ((h as f32 * scale).round() as u32).max(1),
            );
            Bitmap::new(imageops::thumbnail(original.pixels(), pw, ph))
        });
    }
}

impl ImageLoader for MemoryLoader {
    fn image_for_preset(
        &mut self,
        target: ViewId,
        preset: &ImagePreset,
        want_high_res: bool,
    ) -> Option<Bitmap> {
        let key = (target, want_high_res);
        if let Some((preset_id, cached)) = self.cache.get(&key) {
            if *preset_id == preset.id() {
                return Some(cached.clone());
            }
        }

        let source = if want_high_res {
            self.original.as_ref()?
        } else {
            self.preview.as_ref()?
        };
        log::debug!(
            "Rendering preset '{}' at {}x{}",
            preset.name(),
            source.width(),
            source.height()
        );
        let rendered = Bitmap::new((self.render)(source.pixels(), preset));
        self.cache.insert(key, (preset.id(), rendered.clone()));
        Some(rendered)
    }

    fn original_bitmap(&self) -> Option<Bitmap> {
        self.original.clone()
    }

    fn background_bitmap(&mut self, pixels_per_point: f32) -> Option<Bitmap> {
        let tile = (CHECKER_TILE * pixels_per_point.max(1.0)).round() as u32;
        let side = tile * CHECKER_TILES;
        let pixels = RgbaImage::from_fn(side, side, |x, y| {
            if ((x / tile) + (y / tile)) % 2 == 0 {
                Rgba([40, 40, 40, 255])
            } else {
                Rgba([56, 56, 56, 255])
            }
        });
        Some(Bitmap::new(pixels))
    }

    fn reset_image_for_preset(&mut self, preset: &ImagePreset, _target: ViewId) {
        self.cache.retain(|_, (id, _)| *id != preset.id());
    }

    fn save_image(&mut self, preset: &ImagePreset, destination: &Path) -> CanvasResult<()> {
        let original = self.original.as_ref().ok_or(CanvasError::NoImage)?;
        let rendered = (self.render)(original.pixels(), preset);
        rendered.save(destination)?;
        log::info!(
            "Saved '{}' ({}x{}) to {}",
            preset.name(),
            rendered.width(),
            rendered.height(),
            destination.display()
        );
        Ok(())
    }

    fn register_listener(&mut self, target: ViewId) {
        if !self.listeners.contains(&target) {
            self.listeners.push(target);
        }
    }
}
