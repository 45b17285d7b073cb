use egui::{Color32, Pos2, pos2};

use crate::canvas::{Canvas, PaintStyle};
use crate::input::TouchEvent;

/// Highest displayed progress value. The displayed range is `0..=PROGRESS_MAX`.
pub const PROGRESS_MAX: u32 = 200;
/// Displayed progress minus this offset is the filter parameter.
pub const PROGRESS_OFFSET: i32 = 100;

const TRACK_MARGIN: f32 = 20.0;
const TRACK_BOTTOM_OFFSET: f32 = 40.0;
const HANDLE_RADIUS: f32 = 12.0;

pub fn progress_to_parameter(progress: u32) -> i32 {
    progress.min(PROGRESS_MAX) as i32 - PROGRESS_OFFSET
}

pub fn parameter_to_progress(parameter: i32) -> u32 {
    (parameter.clamp(-PROGRESS_OFFSET, PROGRESS_OFFSET) + PROGRESS_OFFSET) as u32
}

/// Receives value and touch notifications from a [`SliderController`].
pub trait SliderListener {
    fn on_new_value(&mut self, value: i32);
    fn on_touch_down(&mut self, x: f32, y: f32);
    fn on_touch_up(&mut self);
}

/// Notification produced by the slider while handling a touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEvent {
    TouchDown(Pos2),
    NewValue(i32),
    TouchUp,
}

impl SliderEvent {
    pub fn dispatch(self, listener: &mut dyn SliderListener) {
        match self {
            SliderEvent::TouchDown(pos) => listener.on_touch_down(pos.x, pos.y),
            SliderEvent::NewValue(value) => listener.on_new_value(value),
            SliderEvent::TouchUp => listener.on_touch_up(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin: Pos2,
    start_progress: u32,
}

/// On-canvas draggable value control.
///
/// A horizontal drag across the full view width sweeps the whole range. The
/// slider does not own a listener; `handle_touch` returns the notifications and
/// the owner dispatches them.
#[derive(Debug)]
pub struct SliderController {
    width: f32,
    height: f32,
    progress: u32,
    drag: Option<DragState>,
}

impl Default for SliderController {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            progress: parameter_to_progress(0),
            drag: None,
        }
    }
}

impl SliderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_geometry(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Syncs the display to a domain value in [-100, 100]
    pub fn set_value(&mut self, parameter: i32) {
        self.progress = parameter_to_progress(parameter);
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn value(&self) -> i32 {
        progress_to_parameter(self.progress)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Clears drag state. The displayed value is left alone.
    pub fn reset(&mut self) {
        self.drag = None;
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) -> Vec<SliderEvent> {
        match *event {
            TouchEvent::Down(pos) => {
                self.drag = Some(DragState {
                    origin: pos,
                    start_progress: self.progress,
                });
                vec![SliderEvent::TouchDown(pos)]
            }
            TouchEvent::Move(pos) => {
                let Some(drag) = self.drag else {
                    return Vec::new();
                };
                if self.width <= 0.0 {
                    return Vec::new();
                }
                let delta = (pos.x - drag.origin.x) / self.width * PROGRESS_MAX as f32;
                let progress = (drag.start_progress as f32 + delta)
                    .round()
                    .clamp(0.0, PROGRESS_MAX as f32) as u32;
                if progress == self.progress {
                    return Vec::new();
                }
                self.progress = progress;
                vec![SliderEvent::NewValue(progress_to_parameter(progress))]
            }
            TouchEvent::Up(_) | TouchEvent::Cancel => {
                if self.drag.take().is_some() {
                    vec![SliderEvent::TouchUp]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Draws the track along the bottom of the view with the handle at the current value.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.width <= TRACK_MARGIN * 2.0 {
            return;
        }
        let y = self.height - TRACK_BOTTOM_OFFSET;
        let left = TRACK_MARGIN;
        let right = self.width - TRACK_MARGIN;

        canvas.line(
            pos2(left, y),
            pos2(right, y),
            &PaintStyle::stroke(Color32::from_gray(150), 2.0),
        );

        let x = left + (right - left) * self.progress as f32 / PROGRESS_MAX as f32;
        canvas.circle(pos2(x, y), HANDLE_RADIUS, &PaintStyle::fill(Color32::WHITE));

        if self.is_dragging() {
            let label = self.value().to_string();
            let style = PaintStyle::text(Color32::WHITE, 24.0);
            let width = canvas.measure_text(&label, style.text_size);
            canvas.text(pos2(x - width / 2.0, y - HANDLE_RADIUS * 2.0), &label, &style);
        }
    }
}
