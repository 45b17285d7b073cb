use egui::{Pos2, Rect, Vec2, pos2};

/// Placement of an image of `image` size inside a view of `view` size.
///
/// Landscape and square images span the full view width and are centered
/// vertically; portrait images span the full height and are centered horizontally.
/// Edges are truncated to whole pixels.
pub fn aspect_fit(image: Vec2, view: Vec2) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Rect::NOTHING;
    }

    let ratio = image.x / image.y;
    let (mut w, mut h) = (view.x, view.x / ratio);
    let (mut tx, mut ty) = (0.0, (view.y - h) / 2.0);

    if ratio < 1.0 {
        h = view.y;
        w = h * ratio;
        tx = (view.x - w) / 2.0;
        ty = 0.0;
    }

    Rect::from_min_max(
        pos2(truncate(tx), truncate(ty)),
        pos2(truncate(w + tx), truncate(h + ty)),
    )
}

/// Maps a view point into image pixel coordinates through the drawn image bounds.
///
/// Returns `None` when the point falls outside the drawn image.
pub fn view_to_image(point: Pos2, bounds: Rect, image: Vec2) -> Option<Pos2> {
    if !bounds.contains(point) || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }
    let u = (point.x - bounds.min.x) / bounds.width();
    let v = (point.y - bounds.min.y) / bounds.height();
    Some(pos2(u * image.x, v * image.y))
}

fn truncate(value: f32) -> f32 {
    value.trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn landscape_fills_width() {
        let rect = aspect_fit(vec2(400.0, 200.0), vec2(800.0, 600.0));
        assert_eq!(rect.width(), 800.0);
        assert_eq!(rect.height(), 400.0);
        assert_eq!(rect.min, pos2(0.0, 100.0));
    }

    #[test]
    fn portrait_fills_height() {
        let rect = aspect_fit(vec2(300.0, 600.0), vec2(800.0, 600.0));
        assert_eq!(rect.height(), 600.0);
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.min, pos2(250.0, 0.0));
    }

    #[test]
    fn square_fits_width_first() {
        let rect = aspect_fit(vec2(100.0, 100.0), vec2(300.0, 500.0));
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.min.y, 100.0);
    }

    #[test]
    fn aspect_is_preserved_within_rounding() {
        for (w, h) in [(1920.0, 1080.0), (1080.0, 1920.0), (333.0, 777.0), (1000.0, 999.0)] {
            let rect = aspect_fit(vec2(w, h), vec2(720.0, 1280.0));
            let drawn = rect.width() / rect.height();
            assert!((drawn - w / h).abs() < 0.01, "{w}x{h} drawn as {drawn}");
        }
    }

    #[test]
    fn empty_image_has_no_placement() {
        assert_eq!(aspect_fit(vec2(0.0, 10.0), vec2(10.0, 10.0)), Rect::NOTHING);
    }

    #[test]
    fn view_point_maps_into_image() {
        let bounds = Rect::from_min_max(pos2(0.0, 100.0), pos2(800.0, 500.0));
        let mapped = view_to_image(pos2(400.0, 300.0), bounds, vec2(4000.0, 2000.0));
        assert_eq!(mapped, Some(pos2(2000.0, 1000.0)));
        assert_eq!(view_to_image(pos2(400.0, 50.0), bounds, vec2(4000.0, 2000.0)), None);
    }
}
