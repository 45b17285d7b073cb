#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use preset_canvas::{
    Bitmap, CanvasResult, FilterHandle, FilterKind, ImageFilter, ImageLoader, ImagePreset,
    LoaderHandle, PanelController, PanelHandle, PresetHandle, RenderCoordinator, ViewId,
};

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Loader whose answers are scripted by the test
#[derive(Default)]
pub struct ScriptedLoader {
    pub original: Option<Bitmap>,
    pub background: Option<Bitmap>,
    /// Answer for each successive `image_for_preset` call; `None` once exhausted
    pub results: VecDeque<Option<Bitmap>>,
    pub background_requests: usize,
    pub listeners: Vec<ViewId>,
    pub saved: Vec<(String, PathBuf)>,
    pub log: CallLog,
}

impl ImageLoader for ScriptedLoader {
    fn image_for_preset(&mut self, _target: ViewId, _preset: &ImagePreset, _hires: bool) -> Option<Bitmap> {
        self.results.pop_front().flatten()
    }

    fn original_bitmap(&self) -> Option<Bitmap> {
        self.original.clone()
    }

    fn background_bitmap(&mut self, _pixels_per_point: f32) -> Option<Bitmap> {
        self.background_requests += 1;
        self.background.clone()
    }

    fn reset_image_for_preset(&mut self, preset: &ImagePreset, _target: ViewId) {
        self.log.borrow_mut().push(format!("reset:{}", preset.name()));
    }

    fn save_image(&mut self, preset: &ImagePreset, destination: &Path) -> CanvasResult<()> {
        self.saved.push((preset.name().to_owned(), destination.to_path_buf()));
        Ok(())
    }

    fn register_listener(&mut self, target: ViewId) {
        self.listeners.push(target);
    }
}

/// Panel controller that records values and what the filter held at notification time
pub struct RecordingPanel {
    pub values: Vec<i32>,
    pub watched: Option<FilterHandle>,
    pub log: CallLog,
}

impl PanelController for RecordingPanel {
    fn on_new_value(&mut self, value: i32) {
        self.values.push(value);
        let seen = self.watched.as_ref().map(|f| f.borrow().parameter());
        self.log.borrow_mut().push(format!("panel:{value}:filter={seen:?}"));
    }
}

pub fn preset_with_filter(name: &str) -> (PresetHandle, FilterHandle) {
    let mut preset = ImagePreset::new(name);
    let filter = preset.add_filter(ImageFilter::new("Brightness", FilterKind::Brightness));
    (preset.into_handle(), filter)
}

pub fn attach_loader(view: &mut RenderCoordinator, loader: ScriptedLoader) -> Rc<RefCell<ScriptedLoader>> {
    let loader = Rc::new(RefCell::new(loader));
    let handle: LoaderHandle = loader.clone();
    view.set_image_loader(Some(handle));
    loader
}

pub fn attach_panel(view: &mut RenderCoordinator, panel: RecordingPanel) -> Rc<RefCell<RecordingPanel>> {
    let panel = Rc::new(RefCell::new(panel));
    let handle: PanelHandle = panel.clone();
    view.set_panel_controller(&handle);
    panel
}
