mod common;

use common::{ScriptedLoader, attach_loader, preset_with_filter};
use egui::{Rect, pos2};
use preset_canvas::canvas::DrawCommand;
use preset_canvas::{Bitmap, CanvasConfig, RecordingCanvas, RenderCoordinator};

fn drawn_bitmaps(view: &mut RenderCoordinator, width: f32, height: f32) -> Vec<uuid::Uuid> {
    let mut canvas = RecordingCanvas::new(width, height);
    view.draw(&mut canvas);
    canvas.bitmaps().into_iter().map(|(id, _)| id).collect()
}

#[test]
fn loader_miss_keeps_previous_result() {
    let filtered = Bitmap::solid(40, 20, [200, 0, 0, 255]);
    let original = Bitmap::solid(40, 20, [0, 0, 0, 255]);
    let mut view = RenderCoordinator::default();
    attach_loader(
        &mut view,
        ScriptedLoader {
            original: Some(original),
            results: vec![Some(filtered.clone()), None, None].into(),
            ..Default::default()
        },
    );
    view.set_image_preset(preset_with_filter("Vintage").0, true);

    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![filtered.id()]);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![filtered.id()]);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![filtered.id()]);
}

#[test]
fn show_original_wins_over_fresh_result() {
    let first = Bitmap::solid(40, 20, [200, 0, 0, 255]);
    let second = Bitmap::solid(40, 20, [0, 200, 0, 255]);
    let original = Bitmap::solid(40, 20, [0, 0, 0, 255]);
    let mut view = RenderCoordinator::default();
    attach_loader(
        &mut view,
        ScriptedLoader {
            original: Some(original.clone()),
            results: vec![Some(first.clone()), Some(second.clone())].into(),
            ..Default::default()
        },
    );
    view.set_image_preset(preset_with_filter("Vintage").0, true);

    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![first.id()]);

    view.show_original(true);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![original.id()]);

    // The result that arrived while the original was shown is remembered.
    view.show_original(false);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![second.id()]);
}

#[test]
fn source_image_is_the_fallback() {
    let original = Bitmap::solid(40, 20, [0, 0, 0, 255]);
    let mut view = RenderCoordinator::default();
    attach_loader(
        &mut view,
        ScriptedLoader {
            original: Some(original.clone()),
            ..Default::default()
        },
    );
    view.set_image_preset(preset_with_filter("Vintage").0, true);

    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![original.id()]);
}

#[test]
fn loader_push_replaces_result() {
    let pushed = Bitmap::solid(10, 10, [1, 1, 1, 255]);
    let mut view = RenderCoordinator::default();
    attach_loader(&mut view, ScriptedLoader::default());
    view.set_image_preset(preset_with_filter("Vintage").0, true);
    view.take_redraw_request();

    view.update_filtered_image(pushed.clone());

    assert!(view.take_redraw_request());
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![pushed.id()]);
}

#[test]
fn background_is_fetched_once_and_stretched() {
    let background = Bitmap::solid(8, 8, [30, 30, 30, 255]);
    let mut view = RenderCoordinator::default();
    let loader = attach_loader(
        &mut view,
        ScriptedLoader {
            background: Some(background.clone()),
            ..Default::default()
        },
    );

    for _ in 0..3 {
        let mut canvas = RecordingCanvas::new(320.0, 240.0);
        view.draw(&mut canvas);
        assert_eq!(
            canvas.bitmaps()[0],
            (background.id(), Rect::from_min_max(pos2(0.0, 0.0), pos2(320.0, 240.0)))
        );
    }
    assert_eq!(loader.borrow().background_requests, 1);
}

#[test]
fn image_bounds_follow_aspect_fit() {
    let mut view = RenderCoordinator::default();
    attach_loader(
        &mut view,
        ScriptedLoader {
            original: Some(Bitmap::solid(400, 200, [0, 0, 0, 255])),
            ..Default::default()
        },
    );
    view.set_image_preset(preset_with_filter("Wide").0, true);
    assert!(view.image_bounds().is_none());

    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    view.draw(&mut canvas);
    assert_eq!(
        view.image_bounds(),
        Some(Rect::from_min_max(pos2(0.0, 100.0), pos2(800.0, 500.0)))
    );

    view.update_filtered_image(Bitmap::solid(100, 200, [0, 0, 0, 255]));
    view.draw(&mut canvas);
    assert_eq!(
        view.image_bounds(),
        Some(Rect::from_min_max(pos2(250.0, 0.0), pos2(550.0, 600.0)))
    );
}

#[test]
fn full_frame_draws_layers_in_order() {
    let config = CanvasConfig {
        show_title: true,
        show_controls: true,
        ..Default::default()
    };
    let mut view = RenderCoordinator::new(config);
    attach_loader(
        &mut view,
        ScriptedLoader {
            original: Some(Bitmap::solid(40, 20, [0, 0, 0, 255])),
            background: Some(Bitmap::solid(4, 4, [9, 9, 9, 255])),
            ..Default::default()
        },
    );
    view.set_image_preset(preset_with_filter("Vintage").0, true);
    view.on_measure(400.0, 300.0);
    view.show_toast("Saved", false, 0.0);

    let mut canvas = RecordingCanvas::new(400.0, 300.0);
    view.draw(&mut canvas);

    let kinds: Vec<&str> = canvas
        .commands()
        .iter()
        .map(|c| match c {
            DrawCommand::Bitmap { .. } => "bitmap",
            DrawCommand::Rect { .. } => "rect",
            DrawCommand::Line { .. } => "line",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Text { .. } => "text",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "bitmap", "bitmap", // background, image
            "rect", "text", // title bar
            "line", // separator
            "line", "circle", // slider
            "text", "text", "text", "text", "text", "text", "text", // toast
        ]
    );
    assert!(matches!(
        &canvas.commands()[4],
        DrawCommand::Line { from, to, width, .. }
            if *from == pos2(0.0, 0.0) && *to == pos2(400.0, 0.0) && *width == 4.0
    ));
}

#[test]
fn title_needs_a_preset() {
    let config = CanvasConfig {
        show_title: true,
        ..Default::default()
    };
    let mut view = RenderCoordinator::new(config);
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    view.draw(&mut canvas);
    assert!(canvas.texts().is_empty());
}

#[test]
fn repeated_toasts_still_hide_in_time() {
    let mut view = RenderCoordinator::default();
    view.show_toast("x", false, 0.0);
    view.show_toast("x", false, 0.1);
    assert_eq!(view.next_deadline(), Some(0.4));

    assert!(!view.tick(0.2));
    assert!(view.toast().is_visible());

    assert!(view.tick(0.45));
    assert!(!view.toast().is_visible());

    // The second hide fires too and never brings the toast back.
    assert!(view.tick(0.55));
    assert!(!view.toast().is_visible());
    assert!(!view.tick(10.0));
    assert_eq!(view.next_deadline(), None);
}

#[test]
fn important_toast_is_red() {
    let mut view = RenderCoordinator::default();
    view.show_toast("Save failed", true, 0.0);
    let mut canvas = RecordingCanvas::new(1000.0, 600.0);
    view.draw(&mut canvas);

    let last = canvas.commands().last().cloned();
    assert!(matches!(
        last,
        Some(DrawCommand::Text { color, size, .. })
            if color == egui::Color32::from_rgb(200, 0, 0) && size == 128.0
    ));
}

#[test]
fn slider_is_drawn_only_with_controls() {
    let mut view = RenderCoordinator::default();
    view.on_measure(400.0, 300.0);

    let mut canvas = RecordingCanvas::new(400.0, 300.0);
    view.draw(&mut canvas);
    assert!(!canvas.commands().iter().any(|c| matches!(c, DrawCommand::Circle { .. })));

    view.set_show_controls(true);
    let mut canvas = RecordingCanvas::new(400.0, 300.0);
    view.draw(&mut canvas);
    assert!(canvas.commands().iter().any(|c| matches!(c, DrawCommand::Circle { .. })));
}

#[test]
fn new_loader_is_registered_and_refetches_background() {
    let first_background = Bitmap::solid(8, 8, [30, 30, 30, 255]);
    let second_background = Bitmap::solid(8, 8, [60, 60, 60, 255]);
    let mut view = RenderCoordinator::default();
    let first = attach_loader(
        &mut view,
        ScriptedLoader {
            background: Some(first_background.clone()),
            ..Default::default()
        },
    );
    assert_eq!(first.borrow().listeners, vec![view.id()]);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![first_background.id()]);

    let second = attach_loader(
        &mut view,
        ScriptedLoader {
            background: Some(second_background.clone()),
            ..Default::default()
        },
    );
    assert_eq!(second.borrow().listeners, vec![view.id()]);
    assert_eq!(drawn_bitmaps(&mut view, 100.0, 100.0), vec![second_background.id()]);
    assert_eq!(first.borrow().background_requests, 1);
    assert_eq!(second.borrow().background_requests, 1);
}

#[test]
fn plain_toast_is_white() {
    let mut view = RenderCoordinator::default();
    view.show_toast("Saved", false, 0.0);
    let mut canvas = RecordingCanvas::new(1000.0, 600.0);
    view.draw(&mut canvas);

    let texts = canvas.texts();
    assert_eq!(texts.len(), 7);
    let last = canvas.commands().last().cloned();
    assert!(matches!(
        last,
        Some(DrawCommand::Text { color, .. }) if color == egui::Color32::WHITE
    ));
    assert!(canvas.commands()[..canvas.commands().len() - 1]
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { color, .. } => Some(*color),
            _ => None,
        })
        .all(|color| color == egui::Color32::BLACK));
}
