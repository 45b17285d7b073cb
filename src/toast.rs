use egui::{Color32, pos2};

use crate::canvas::{Canvas, PaintStyle};

/// How long a toast stays visible, in seconds
pub const TOAST_DURATION_SECS: f64 = 0.4;

/// Offsets of the black copies drawn underneath the message to outline it
const OUTLINE_OFFSETS: [(f32, f32); 6] = [
    (-2.0, -2.0),
    (-2.0, 0.0),
    (0.0, -2.0),
    (2.0, 2.0),
    (2.0, 0.0),
    (0.0, 2.0),
];

const IMPORTANT_COLOR: Color32 = Color32::from_rgb(200, 0, 0);

/// Identifies one scheduled hide so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HideToken(u64);

/// Transient on-canvas message with a fixed auto-hide delay.
///
/// Every `show` schedules its own hide. Showing again does not cancel earlier
/// hides, and each one clears visibility unconditionally when it fires.
#[derive(Debug, Default)]
pub struct Toast {
    message: Option<String>,
    important: bool,
    visible: bool,
    /// Scheduled hides with their deadline in seconds
    pending: Vec<(HideToken, f64)>,
    next_token: u64,
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` and schedules a hide `TOAST_DURATION_SECS` after `now`.
    pub fn show(&mut self, text: impl Into<String>, important: bool, now: f64) -> HideToken {
        self.message = Some(text.into());
        self.important = important;
        self.visible = true;

        let token = HideToken(self.next_token);
        self.next_token += 1;
        self.pending.push((token, now + TOAST_DURATION_SECS));
        token
    }

    /// Runs every hide whose deadline has passed. Returns true if any fired.
    pub fn tick(&mut self, now: f64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, deadline)| *deadline > now);
        let fired = self.pending.len() != before;
        if fired {
            self.visible = false;
        }
        fired
    }

    /// Removes a scheduled hide. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, token: HideToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(t, _)| *t != token);
        self.pending.len() != before
    }

    /// Earliest pending hide deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|(_, deadline)| *deadline)
            .min_by(f64::total_cmp)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_important(&self) -> bool {
        self.important
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Draws the message a third of the way down the view, horizontally centered,
    /// over six black copies nudged by two pixels.
    pub fn draw(&self, canvas: &mut dyn Canvas, text_size: f32) {
        let Some(message) = self.message.as_deref() else {
            return;
        };
        if !self.visible {
            return;
        }

        let size = canvas.size();
        let text_width = canvas.measure_text(message, text_size);
        let x = ((size.x - text_width) / 2.0).trunc();
        let y = (size.y / 3.0).trunc();

        let outline = PaintStyle::text(Color32::BLACK, text_size);
        for (dx, dy) in OUTLINE_OFFSETS {
            canvas.text(pos2(x + dx, y + dy), message, &outline);
        }

        let color = if self.important {
            IMPORTANT_COLOR
        } else {
            Color32::WHITE
        };
        canvas.text(pos2(x, y), message, &PaintStyle::text(color, text_size));
    }
}
