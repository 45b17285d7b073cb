use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use image::{RgbaImage, imageops};

use crate::bitmap::Bitmap;
use crate::canvas::EguiCanvas;
use crate::config::CanvasConfig;
use crate::coordinator::{PanelController, PanelHandle, RenderCoordinator};
use crate::event::LoggingHandler;
use crate::file_handler::{FileHandler, load_bitmap};
use crate::input::TouchTranslator;
use crate::loader::{LoaderHandle, MemoryLoader};
use crate::preset::{FilterKind, ImageFilter, ImagePreset};
use crate::texture_manager::TextureManager;

const CONFIG_KEY: &str = "preset_canvas_config";

/// Applies the demo filters with the `image` crate's color operations.
fn render_preset(source: &RgbaImage, preset: &ImagePreset) -> RgbaImage {
    let mut out = source.clone();
    for filter in preset.filters() {
        let filter = filter.borrow();
        if filter.is_nil() {
            continue;
        }
        out = match filter.kind() {
            FilterKind::Brightness => imageops::brighten(&out, filter.parameter()),
            FilterKind::Contrast => imageops::contrast(&out, filter.parameter() as f32),
            FilterKind::Hue => imageops::huerotate(&out, filter.parameter() * 180 / 100),
            FilterKind::Custom => out,
        };
    }
    out
}

fn preset_catalog() -> Vec<ImagePreset> {
    vec![
        ImagePreset::new("Original"),
        ImagePreset::new("Bright")
            .with_filter(ImageFilter::new("Brightness", FilterKind::Brightness)),
        ImagePreset::new("Vintage")
            .with_filter(ImageFilter::new("Contrast", FilterKind::Contrast))
            .with_filter(ImageFilter::new("Hue", FilterKind::Hue)),
        ImagePreset::new("Punchy")
            .with_filter(ImageFilter::new("Contrast", FilterKind::Contrast))
            .with_filter(ImageFilter::new("Brightness", FilterKind::Brightness)),
    ]
}

/// Horizontal gradient shown when no image was given on the command line
fn placeholder_bitmap() -> Bitmap {
    Bitmap::new(RgbaImage::from_fn(640, 426, |x, y| {
        image::Rgba([(x * 255 / 640) as u8, (y * 255 / 426) as u8, 160, 255])
    }))
}

/// Remembers the last value so the side panel can display it
#[derive(Debug, Default)]
struct ValueReadout {
    last: Option<i32>,
}

impl PanelController for ValueReadout {
    fn on_new_value(&mut self, value: i32) {
        self.last = Some(value);
    }
}

/// Desktop host for a single [`RenderCoordinator`].
pub struct CanvasApp {
    coordinator: RenderCoordinator,
    loader: Rc<RefCell<MemoryLoader>>,
    readout: Rc<RefCell<ValueReadout>>,
    textures: TextureManager,
    touch: TouchTranslator,
    file_handler: FileHandler,
    started: Instant,
    save_path: String,
    selected_filter: Option<usize>,
}

impl CanvasApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        image_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let config = match config_path {
            Some(path) => CanvasConfig::load(&path).unwrap_or_else(|err| {
                log::error!("Ignoring config {}: {err}", path.display());
                CanvasConfig::default()
            }),
            None => cc
                .storage
                .and_then(|storage| eframe::get_value(storage, CONFIG_KEY))
                .unwrap_or_default(),
        };

        let source = match image_path {
            Some(path) => load_bitmap(&path).unwrap_or_else(|err| {
                log::error!("Failed to open {}: {err}", path.display());
                placeholder_bitmap()
            }),
            None => placeholder_bitmap(),
        };

        let loader = Rc::new(RefCell::new(
            MemoryLoader::new(source).with_renderer(render_preset),
        ));
        let readout = Rc::new(RefCell::new(ValueReadout::default()));

        let textures = TextureManager::new(config.texture_cache_size);
        let mut coordinator = RenderCoordinator::new(config);
        let loader_handle: LoaderHandle = loader.clone();
        coordinator.set_image_loader(Some(loader_handle));
        let panel_handle: PanelHandle = readout.clone();
        coordinator.set_panel_controller(&panel_handle);
        coordinator.subscribe(Box::new(LoggingHandler));

        let mut app = Self {
            coordinator,
            loader,
            readout,
            textures,
            touch: TouchTranslator::new(egui::Rect::NOTHING),
            file_handler: FileHandler::new(),
            started: Instant::now(),
            save_path: "edited.png".to_owned(),
            selected_filter: None,
        };
        if let Some(first) = preset_catalog().into_iter().next() {
            app.install_preset(first);
        }
        app
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn install_preset(&mut self, preset: ImagePreset) {
        self.coordinator.set_image_preset(preset.into_handle(), true);
        self.select_filter(0);
    }

    /// Makes filter `index` of the current preset the one the slider edits.
    fn select_filter(&mut self, index: usize) {
        let filter = self
            .coordinator
            .image_preset()
            .and_then(|p| p.borrow().filters().get(index).cloned());
        self.selected_filter = filter.as_ref().map(|_| index);
        self.coordinator.set_current_filter(filter.as_ref());
        self.coordinator.select();
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Presets");
        ui.horizontal_wrapped(|ui| {
            for preset in preset_catalog() {
                if ui.button(preset.name()).clicked() {
                    self.install_preset(preset);
                }
            }
        });
        ui.separator();

        let filter_names: Vec<String> = self
            .coordinator
            .image_preset()
            .map(|p| p.borrow().filters().iter().map(|f| f.borrow().name().to_owned()).collect())
            .unwrap_or_default();
        if !filter_names.is_empty() {
            ui.label("Adjust:");
            ui.horizontal_wrapped(|ui| {
                for (i, name) in filter_names.iter().enumerate() {
                    if ui.selectable_label(self.selected_filter == Some(i), name).clicked() {
                        self.select_filter(i);
                    }
                }
            });
        }

        if self.coordinator.seek_bar_visible() {
            let mut progress = self.coordinator.slider().progress();
            if ui
                .add(egui::Slider::new(&mut progress, 0..=200).show_value(false))
                .changed()
            {
                self.coordinator.on_progress_changed(progress);
            }
        }
        if let Some(value) = self.readout.borrow().last {
            ui.label(format!("Value: {value}"));
        }

        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.coordinator.reset_parameter();
            }
            let mut original = self.coordinator.is_showing_original();
            if ui.checkbox(&mut original, "Original").changed() {
                self.coordinator.show_original(original);
            }
        });
        ui.horizontal(|ui| {
            let mut controls = self.coordinator.show_controls();
            if ui.checkbox(&mut controls, "Controls").changed() {
                self.coordinator.set_show_controls(controls);
            }
            let mut title = self.coordinator.config().show_title;
            if ui.checkbox(&mut title, "Title").changed() {
                self.coordinator.set_show_title(title);
            }
        });
        ui.separator();

        ui.heading("History");
        let current = self.coordinator.history().current();
        let mut clicked = None;
        for (i, name) in self.coordinator.history().names().iter().enumerate() {
            if ui.selectable_label(current == Some(i), name).clicked() {
                clicked = Some(i);
            }
        }
        if let Some(index) = clicked {
            self.coordinator.on_item_click(index);
            self.select_filter(0);
        }
        ui.separator();

        ui.heading("State");
        for entry in self.coordinator.image_state().entries() {
            ui.label(format!("{}: {}", entry.name, entry.parameter));
        }
        ui.separator();

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.save_path);
            if ui.button("Save").clicked() {
                let now = self.now();
                match self.coordinator.save_image(std::path::Path::new(&self.save_path)) {
                    Ok(()) => self.coordinator.show_toast("Saved", false, now),
                    Err(err) => {
                        log::error!("Save failed: {err}");
                        self.coordinator.show_toast("Save failed", true, now);
                    }
                }
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        self.coordinator.on_measure(rect.width(), rect.height());
        self.coordinator.set_pixels_per_point(ctx.pixels_per_point());
        self.touch.set_view_rect(rect);
        for event in self.touch.process_input(ctx) {
            self.coordinator.on_touch_event(&event);
        }

        self.textures.begin_frame();
        let mut canvas = EguiCanvas::new(&painter, &mut self.textures, rect);
        self.coordinator.draw(&mut canvas);
    }
}

impl eframe::App for CanvasApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, CONFIG_KEY, self.coordinator.config());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now();
        self.coordinator.tick(now);

        if let Some(bitmap) = self.file_handler.take_dropped_image(ctx) {
            self.loader.borrow_mut().set_original(bitmap);
            self.coordinator.update_image();
            self.coordinator.show_toast("Image loaded", false, now);
        }
        self.file_handler.preview_files_being_dropped(ctx);

        egui::SidePanel::right("canvas_controls")
            .default_width(240.0)
            .show(ctx, |ui| self.side_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui, ctx));

        if self.coordinator.take_redraw_request() {
            ctx.request_repaint();
        }
        if let Some(deadline) = self.coordinator.next_deadline() {
            ctx.request_repaint_after(Duration::from_secs_f64((deadline - now).max(0.0)));
        }
    }
}
