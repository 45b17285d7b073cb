use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2};
use uuid::Uuid;

use crate::bitmap::Bitmap;
use crate::texture_manager::TextureManager;

/// Drawing style for a single draw call.
///
/// Built fresh for each call instead of being kept on the view, so one draw step
/// can never leak its color or stroke into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub color: Color32,
    pub stroke_width: f32,
    pub text_size: f32,
}

impl PaintStyle {
    pub const fn fill(color: Color32) -> Self {
        Self {
            color,
            stroke_width: 1.0,
            text_size: 14.0,
        }
    }

    pub const fn stroke(color: Color32, width: f32) -> Self {
        Self {
            color,
            stroke_width: width,
            text_size: 14.0,
        }
    }

    pub const fn text(color: Color32, size: f32) -> Self {
        Self {
            color,
            stroke_width: 1.0,
            text_size: size,
        }
    }
}

/// A surface the coordinator draws one frame onto, in view-local coordinates
/// with the origin at the top-left corner of the view.
pub trait Canvas {
    fn size(&self) -> Vec2;

    /// Stretches the whole bitmap into `dest`
    fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect);

    fn fill_rect(&mut self, rect: Rect, style: &PaintStyle);

    fn line(&mut self, from: Pos2, to: Pos2, style: &PaintStyle);

    fn circle(&mut self, center: Pos2, radius: f32, style: &PaintStyle);

    /// Draws `text` with its baseline starting at `pos`
    fn text(&mut self, pos: Pos2, text: &str, style: &PaintStyle);

    /// Width of `text` when drawn at `size`
    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// Canvas backed by an egui painter.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    textures: &'a mut TextureManager,
    rect: Rect,
}

impl<'a> EguiCanvas<'a> {
    /// `rect` is the screen rectangle allocated to the view
    pub fn new(painter: &'a Painter, textures: &'a mut TextureManager, rect: Rect) -> Self {
        Self {
            painter,
            textures,
            rect,
        }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        pos + self.rect.min.to_vec2()
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        rect.translate(self.rect.min.to_vec2())
    }
}

impl Canvas for EguiCanvas<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect) {
        let texture = self.textures.texture_for(bitmap, self.painter.ctx());
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        self.painter
            .image(texture, self.rect_to_screen(dest), uv, Color32::WHITE);
    }

    fn fill_rect(&mut self, rect: Rect, style: &PaintStyle) {
        self.painter
            .rect_filled(self.rect_to_screen(rect), 0.0, style.color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, style: &PaintStyle) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(style.stroke_width, style.color),
        );
    }

    fn circle(&mut self, center: Pos2, radius: f32, style: &PaintStyle) {
        self.painter
            .circle_filled(self.to_screen(center), radius, style.color);
    }

    fn text(&mut self, pos: Pos2, text: &str, style: &PaintStyle) {
        self.painter.text(
            self.to_screen(pos),
            Align2::LEFT_BOTTOM,
            text,
            FontId::proportional(style.text_size),
            style.color,
        );
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
            .size()
            .x
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Bitmap { id: Uuid, dest: Rect },
    Rect { rect: Rect, color: Color32 },
    Line { from: Pos2, to: Pos2, color: Color32, width: f32 },
    Circle { center: Pos2, radius: f32, color: Color32 },
    Text { pos: Pos2, text: String, color: Color32, size: f32 },
}

/// Canvas that records draw calls instead of rasterizing them.
///
/// Text width is approximated as half the font size per character, which keeps
/// layout deterministic without loading fonts.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Ids and destinations of every bitmap drawn, in order
    pub fn bitmaps(&self) -> Vec<(Uuid, Rect)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Bitmap { id, dest } => Some((*id, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect) {
        self.commands.push(DrawCommand::Bitmap {
            id: bitmap.id(),
            dest,
        });
    }

    fn fill_rect(&mut self, rect: Rect, style: &PaintStyle) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color: style.color,
        });
    }

    fn line(&mut self, from: Pos2, to: Pos2, style: &PaintStyle) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: style.color,
            width: style.stroke_width,
        });
    }

    fn circle(&mut self, center: Pos2, radius: f32, style: &PaintStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: style.color,
        });
    }

    fn text(&mut self, pos: Pos2, text: &str, style: &PaintStyle) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_owned(),
            color: style.color,
            size: style.text_size,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }
}
