//! The canvas view: draws the active preset's result and relays parameter edits.
//!
//! A frame is drawn in a fixed order:
//!
//! ```text
//! background ─► filtered image (aspect fit) ─► title bar ─► separator ─► slider ─► toast
//! ```
//!
//! A parameter edit runs the same sequence whether it comes from the on-canvas
//! slider, the seek bar or a direct call:
//!
//! ```text
//! filter.set_parameter ─► loader reset ─► state list refill ─► panel notify ─► slider sync ─► redraw
//! ```
//!
//! Collaborators (loader, filter, panel controller) are optional. Each step that
//! needs a missing collaborator is skipped; nothing here reports an error for it.

use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};

use egui::{Color32, Pos2, Rect, Vec2, pos2};

use crate::bitmap::Bitmap;
use crate::canvas::{Canvas, PaintStyle};
use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::event::{CanvasEvent, EventBus, EventHandler};
use crate::geometry::aspect_fit;
use crate::history::{HistoryModel, ImageStateModel};
use crate::input::TouchEvent;
use crate::loader::{LoaderHandle, ViewId};
use crate::preset::{FilterHandle, ImageFilter, PresetHandle};
use crate::slider::{SliderController, SliderListener, progress_to_parameter};
use crate::toast::Toast;

/// Sibling UI coordinator told about every parameter change.
pub trait PanelController {
    fn on_new_value(&mut self, value: i32);
}

pub type PanelHandle = Rc<RefCell<dyn PanelController>>;

const TITLE_BAR_COLOR: Color32 = Color32::from_black_alpha(200);
const TITLE_TEXT_COLOR: Color32 = Color32::from_gray(200);
const SEPARATOR_COLOR: Color32 = Color32::from_gray(150);

/// Interactive canvas for one preset-driven image.
///
/// Holds the current preset, observes the current filter and panel controller
/// without keeping them alive, and caches the bitmaps it last drew.
pub struct RenderCoordinator {
    id: ViewId,
    config: CanvasConfig,
    pixels_per_point: f32,

    preset: Option<PresetHandle>,
    loader: Option<LoaderHandle>,
    current_filter: Option<Weak<RefCell<ImageFilter>>>,
    panel: Option<Weak<RefCell<dyn PanelController>>>,

    background: Option<Bitmap>,
    /// The unfiltered source image
    foreground: Option<Bitmap>,
    /// Last filtered result the loader handed out
    filtered: Option<Bitmap>,
    image_bounds: Option<Rect>,

    rotation: f32,
    rotation_zoom: f32,
    show_original: bool,
    touch: Pos2,

    slider: SliderController,
    toast: Toast,
    history: HistoryModel,
    image_state: ImageStateModel,
    events: EventBus,
    redraw_requested: bool,
}

impl std::fmt::Debug for RenderCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("id", &self.id)
            .field("preset", &self.preset.as_ref().map(|p| p.borrow().name().to_owned()))
            .field("has_loader", &self.loader.is_some())
            .field("show_original", &self.show_original)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Default for RenderCoordinator {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl RenderCoordinator {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            id: ViewId::new(),
            config,
            pixels_per_point: 1.0,
            preset: None,
            loader: None,
            current_filter: None,
            panel: None,
            background: None,
            foreground: None,
            filtered: None,
            image_bounds: None,
            rotation: 0.0,
            rotation_zoom: 0.0,
            show_original: false,
            touch: Pos2::ZERO,
            slider: SliderController::new(),
            toast: Toast::new(),
            history: HistoryModel::new(),
            image_state: ImageStateModel::default(),
            events: EventBus::new(),
            redraw_requested: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // ---- collaborators ----

    /// Attaches a loader and registers this view as one of its listeners.
    pub fn set_image_loader(&mut self, loader: Option<LoaderHandle>) {
        if let Some(loader) = &loader {
            loader.borrow_mut().register_listener(self.id);
        }
        self.loader = loader;
        self.background = None;
    }

    pub fn set_panel_controller(&mut self, panel: &PanelHandle) {
        self.panel = Some(Rc::downgrade(panel));
    }

    fn panel_controller(&self) -> Option<PanelHandle> {
        self.panel.as_ref().and_then(Weak::upgrade)
    }

    /// Observes `filter` as the target of parameter edits.
    pub fn set_current_filter(&mut self, filter: Option<&FilterHandle>) {
        self.current_filter = filter.map(Rc::downgrade);
    }

    /// The observed filter, if it is still alive
    pub fn current_filter(&self) -> Option<FilterHandle> {
        self.current_filter.as_ref().and_then(Weak::upgrade)
    }

    /// Registers an observer for canvas events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    // ---- parameter feedback ----

    /// Starts adjusting the current filter: shows its value without changing it.
    pub fn select(&mut self) {
        let Some(filter) = self.current_filter() else {
            return;
        };
        let parameter = filter.borrow().parameter();
        self.slider.set_value(parameter);
        if let Some(panel) = self.panel_controller() {
            panel.borrow_mut().on_new_value(parameter);
        }
    }

    pub fn unselect(&mut self) {}

    /// Applies a new parameter value to the current filter and propagates it.
    pub fn on_new_value(&mut self, value: i32) {
        if let Some(filter) = self.current_filter() {
            filter.borrow_mut().set_parameter(value);
        }

        if let Some(preset) = &self.preset {
            let preset = preset.borrow();
            if let Some(loader) = &self.loader {
                loader.borrow_mut().reset_image_for_preset(&preset, self.id);
            }
            preset.fill_state_model(&mut self.image_state);
        }

        if let Some(panel) = self.panel_controller() {
            panel.borrow_mut().on_new_value(value);
        }

        self.slider.set_value(value);
        self.events.emit(CanvasEvent::ParameterChanged { value });
        self.invalidate();
    }

    /// Sets the parameter back to neutral and drops any drag in progress.
    pub fn reset_parameter(&mut self) {
        self.on_new_value(0);
        self.slider.reset();
    }

    /// Seek-bar callback; `progress` is in the displayed range `0..=200`.
    pub fn on_progress_changed(&mut self, progress: u32) {
        self.on_new_value(progress_to_parameter(progress));
    }

    pub fn on_touch_down(&mut self, x: f32, y: f32) {
        self.touch = pos2(x, y);
        self.invalidate();
    }

    pub fn on_touch_up(&mut self) {}

    // ---- input ----

    /// Forwards a touch to the slider and consumes it.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        for slider_event in self.slider.handle_touch(event) {
            slider_event.dispatch(&mut *self);
        }
        self.invalidate();
        true
    }

    /// Records the size the host laid the view out at.
    pub fn on_measure(&mut self, width: f32, height: f32) {
        self.slider.set_geometry(width, height);
    }

    /// Display density used to pick the background asset
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if (pixels_per_point - self.pixels_per_point).abs() > f32::EPSILON {
            self.pixels_per_point = pixels_per_point;
            self.background = None;
        }
    }

    // ---- presets & history ----

    /// Installs `preset` as the one being edited.
    ///
    /// With `add_to_history` the preset is inserted at the front of the history.
    /// The filtered result is not recomputed here; the next draw asks the loader.
    pub fn set_image_preset(&mut self, preset: PresetHandle, add_to_history: bool) {
        self.preset = Some(Rc::clone(&preset));
        if add_to_history {
            self.history.insert(Rc::clone(&preset), 0);
        }
        preset.borrow_mut().set_render_target(self.id);
        self.update_image();

        let name = {
            let preset = preset.borrow();
            preset.fill_state_model(&mut self.image_state);
            preset.name().to_owned()
        };
        log::debug!("Installed preset '{name}' (history: {add_to_history})");
        self.events.emit(CanvasEvent::PresetInstalled {
            name,
            added_to_history: add_to_history,
        });
        self.invalidate();
    }

    pub fn clear_image_preset(&mut self) {
        self.preset = None;
        self.image_state.clear();
        self.invalidate();
    }

    pub fn image_preset(&self) -> Option<PresetHandle> {
        self.preset.clone()
    }

    /// Installs a copy of history entry `index` so further edits leave history alone.
    pub fn on_item_click(&mut self, index: usize) {
        let Some(entry) = self.history.get(index) else {
            log::debug!("History index {index} out of range");
            return;
        };
        let copy = entry.borrow().duplicate().into_handle();
        self.set_image_preset(copy, false);
        self.history.set_current(index);
        self.events.emit(CanvasEvent::HistorySelected { index });
    }

    pub fn history(&self) -> &HistoryModel {
        &self.history
    }

    pub fn image_state(&self) -> &ImageStateModel {
        &self.image_state
    }

    // ---- bitmaps ----

    /// Refetches the unfiltered source image from the loader.
    pub fn update_image(&mut self) {
        self.foreground = self.original_front_bitmap();
    }

    /// Loader push of a freshly computed result
    pub fn update_filtered_image(&mut self, bitmap: Bitmap) {
        self.filtered = Some(bitmap);
        self.invalidate();
    }

    pub fn original_front_bitmap(&self) -> Option<Bitmap> {
        self.loader
            .as_ref()
            .and_then(|loader| loader.borrow().original_bitmap())
    }

    /// Where the image was drawn in the last frame, in view coordinates
    pub fn image_bounds(&self) -> Option<Rect> {
        self.image_bounds
    }

    pub fn save_image(&mut self, destination: &Path) -> CanvasResult<()> {
        let preset = self.preset.clone().ok_or(CanvasError::NoPreset)?;
        let loader = self.loader.clone().ok_or(CanvasError::NoImage)?;
        loader
            .borrow_mut()
            .save_image(&preset.borrow(), destination)?;
        self.events.emit(CanvasEvent::ImageSaved {
            path: destination.to_path_buf(),
        });
        Ok(())
    }

    // ---- display modes ----

    pub fn show_original(&mut self, show: bool) {
        self.show_original = show;
        self.invalidate();
    }

    pub fn is_showing_original(&self) -> bool {
        self.show_original
    }

    pub fn set_show_controls(&mut self, show: bool) -> &mut Self {
        self.config.show_controls = show;
        self
    }

    pub fn show_controls(&self) -> bool {
        self.config.show_controls
    }

    /// The host seek bar follows the controls flag
    pub fn seek_bar_visible(&self) -> bool {
        self.config.show_controls
    }

    pub fn set_show_title(&mut self, show: bool) -> &mut Self {
        self.config.show_title = show;
        self
    }

    /// Sets rotation and zoom together; only a new angle requests a redraw.
    pub fn set_image_rotation(&mut self, rotation: f32, zoom_factor: f32) {
        if rotation != self.rotation {
            self.invalidate();
        }
        self.rotation = rotation;
        self.rotation_zoom = zoom_factor;
    }

    pub fn image_rotation(&self) -> f32 {
        self.rotation
    }

    pub fn image_rotation_zoom_factor(&self) -> f32 {
        self.rotation_zoom
    }

    pub fn touch_point(&self) -> Pos2 {
        self.touch
    }

    pub fn slider(&self) -> &SliderController {
        &self.slider
    }

    // ---- toast ----

    /// Shows `text` for 400 ms from `now` (seconds). Earlier hides stay scheduled.
    pub fn show_toast(&mut self, text: &str, important: bool, now: f64) {
        self.toast.show(text, important, now);
        self.events.emit(CanvasEvent::ToastShown {
            message: text.to_owned(),
            important,
        });
        self.invalidate();
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    /// Runs due timers. Returns true if anything changed on screen.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.toast.tick(now) {
            return false;
        }
        self.events.emit(CanvasEvent::ToastHidden);
        self.invalidate();
        true
    }

    /// When the next timer is due, for scheduling a wake-up
    pub fn next_deadline(&self) -> Option<f64> {
        self.toast.next_deadline()
    }

    // ---- redraw ----

    pub fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    /// Returns and clears the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ---- drawing ----

    /// Draws one frame.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let size = canvas.size();

        self.draw_background(canvas, size);

        if let Some(image) = self.resolve_filtered_image() {
            self.draw_image(canvas, &image, size);
        }

        if self.config.show_title {
            self.draw_title(canvas, size);
        }

        canvas.line(
            Pos2::ZERO,
            pos2(size.x, 0.0),
            &PaintStyle::stroke(SEPARATOR_COLOR, self.config.separator_width),
        );

        if self.config.show_controls {
            self.slider.draw(canvas);
        }

        self.toast.draw(canvas, self.config.toast_text_size);
    }

    fn draw_background(&mut self, canvas: &mut dyn Canvas, size: Vec2) {
        if self.background.is_none() {
            if let Some(loader) = &self.loader {
                self.background = loader.borrow_mut().background_bitmap(self.pixels_per_point);
            }
        }
        if let Some(background) = &self.background {
            canvas.draw_bitmap(background, Rect::from_min_size(Pos2::ZERO, size));
        }
    }

    /// Picks the bitmap to show this frame.
    ///
    /// A fresh loader result replaces the remembered one; a miss keeps showing
    /// the last result. The source image is shown when asked for, or when no
    /// result has ever arrived.
    pub fn resolve_filtered_image(&mut self) -> Option<Bitmap> {
        if let (Some(loader), Some(preset)) = (&self.loader, &self.preset) {
            let fresh = loader.borrow_mut().image_for_preset(
                self.id,
                &preset.borrow(),
                self.config.show_hires,
            );
            if fresh.is_some() {
                self.filtered = fresh;
            }
        }

        if self.show_original || self.filtered.is_none() {
            if self.foreground.is_none() {
                self.update_image();
            }
            return self.foreground.clone();
        }
        self.filtered.clone()
    }

    fn draw_image(&mut self, canvas: &mut dyn Canvas, image: &Bitmap, size: Vec2) {
        let dest = aspect_fit(image.size(), size);
        self.image_bounds = Some(dest);
        canvas.draw_bitmap(image, dest);
    }

    fn draw_title(&self, canvas: &mut dyn Canvas, size: Vec2) {
        let Some(preset) = &self.preset else {
            return;
        };
        let text_size = self.config.title_text_size;
        let padding = self.config.title_padding;

        canvas.fill_rect(
            Rect::from_min_size(Pos2::ZERO, egui::vec2(size.x, text_size + padding)),
            &PaintStyle::fill(TITLE_BAR_COLOR),
        );
        canvas.text(
            pos2(padding, 10.0 + padding),
            preset.borrow().name(),
            &PaintStyle::text(TITLE_TEXT_COLOR, text_size),
        );
    }
}

impl SliderListener for RenderCoordinator {
    fn on_new_value(&mut self, value: i32) {
        RenderCoordinator::on_new_value(self, value);
    }

    fn on_touch_down(&mut self, x: f32, y: f32) {
        RenderCoordinator::on_touch_down(self, x, y);
    }

    fn on_touch_up(&mut self) {
        RenderCoordinator::on_touch_up(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::preset::{FilterKind, ImagePreset};

    fn preset_with_filter(name: &str) -> (PresetHandle, FilterHandle) {
        let mut preset = ImagePreset::new(name);
        let filter = preset.add_filter(ImageFilter::new("Brightness", FilterKind::Brightness));
        (preset.into_handle(), filter)
    }

    #[test]
    fn new_value_without_collaborators_still_syncs_display() {
        let mut view = RenderCoordinator::default();
        view.on_new_value(-35);
        assert_eq!(view.slider().progress(), 65);
        assert!(view.take_redraw_request());
        assert!(!view.needs_redraw());
    }

    #[test]
    fn select_reads_without_mutating() {
        let mut view = RenderCoordinator::default();
        let (preset, filter) = preset_with_filter("Vintage");
        filter.borrow_mut().set_parameter(42);
        view.set_image_preset(preset, true);
        view.set_current_filter(Some(&filter));

        view.select();

        assert_eq!(view.slider().progress(), 142);
        assert_eq!(filter.borrow().parameter(), 42);
    }

    #[test]
    fn dropped_filter_is_not_kept_alive() {
        let mut view = RenderCoordinator::default();
        let (_, filter) = preset_with_filter("Gone");
        view.set_current_filter(Some(&filter));
        drop(filter);

        assert!(view.current_filter().is_none());
        view.on_new_value(10);
        assert_eq!(view.slider().progress(), 110);
    }

    #[test]
    fn rotation_redraws_only_on_new_angle() {
        let mut view = RenderCoordinator::default();
        view.set_image_rotation(0.0, 2.0);
        assert!(!view.take_redraw_request());
        assert_eq!(view.image_rotation_zoom_factor(), 2.0);

        view.set_image_rotation(90.0, 1.5);
        assert!(view.take_redraw_request());
        assert_eq!(view.image_rotation(), 90.0);
    }

    #[test]
    fn touch_down_is_recorded() {
        let mut view = RenderCoordinator::default();
        view.on_measure(400.0, 300.0);
        assert!(view.on_touch_event(&TouchEvent::Down(pos2(12.0, 34.0))));
        assert_eq!(view.touch_point(), pos2(12.0, 34.0));
    }

    #[test]
    fn frame_without_anything_draws_only_separator() {
        let mut view = RenderCoordinator::default();
        let mut canvas = RecordingCanvas::new(200.0, 100.0);

        view.draw(&mut canvas);

        assert_eq!(canvas.commands().len(), 1);
        assert!(matches!(
            canvas.commands()[0],
            DrawCommand::Line { width, color, .. } if width == 4.0 && color == SEPARATOR_COLOR
        ));
    }

    #[test]
    fn title_bar_shows_preset_name() {
        let mut view = RenderCoordinator::default();
        view.set_show_title(true);
        view.set_image_preset(ImagePreset::new("Vintage").into_handle(), false);
        let mut canvas = RecordingCanvas::new(200.0, 100.0);

        view.draw(&mut canvas);

        assert!(matches!(
            &canvas.commands()[0],
            DrawCommand::Rect { rect, color } if rect.height() == 44.0 && *color == TITLE_BAR_COLOR
        ));
        assert!(matches!(
            &canvas.commands()[1],
            DrawCommand::Text { text, pos, .. } if text == "Vintage" && *pos == pos2(20.0, 30.0)
        ));
    }

    #[test]
    fn save_without_preset_is_an_error() {
        let mut view = RenderCoordinator::default();
        let err = view.save_image(Path::new("out.png")).unwrap_err();
        assert!(matches!(err, CanvasError::NoPreset));
    }
}
