#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use preset_canvas::CanvasApp;

// Usage: preset-canvas [IMAGE] [CONFIG_JSON]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let image_path = args.next();
    let config_path = args.next();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("Preset Canvas"),
        ..Default::default()
    };
    eframe::run_native(
        "preset-canvas",
        native_options,
        Box::new(move |cc| Ok(Box::new(CanvasApp::new(cc, image_path, config_path)))),
    )
}
