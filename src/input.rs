use egui::{Context, PointerButton, Pos2, Rect};

/// Touch-style input in view-local coordinates (origin at the view's top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    /// The gesture ended without a release position, e.g. the pointer left the window
    Cancel,
}

/// Primary-pointer state sampled from one frame of input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Pointer position in screen coordinates, if the pointer is over the window
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    pub down: bool,
}

impl PointerSample {
    pub fn from_context(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            pos: input.pointer.interact_pos(),
            pressed: input.pointer.button_pressed(PointerButton::Primary),
            released: input.pointer.button_released(PointerButton::Primary),
            down: input.pointer.button_down(PointerButton::Primary),
        })
    }
}

/// Turns egui pointer input into touch events for one view.
///
/// A gesture starts only when the press lands inside the view; once started it
/// keeps reporting moves outside the view until release.
#[derive(Debug)]
pub struct TouchTranslator {
    view_rect: Rect,
    touching: bool,
    last_pos: Option<Pos2>,
}

impl TouchTranslator {
    pub fn new(view_rect: Rect) -> Self {
        Self {
            view_rect,
            touching: false,
            last_pos: None,
        }
    }

    /// Update the view rectangle (e.g. if the window is resized)
    pub fn set_view_rect(&mut self, rect: Rect) {
        self.view_rect = rect;
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn process_input(&mut self, ctx: &Context) -> Vec<TouchEvent> {
        self.translate(PointerSample::from_context(ctx))
    }

    pub fn translate(&mut self, sample: PointerSample) -> Vec<TouchEvent> {
        let mut events = Vec::new();
        let origin = self.view_rect.min.to_vec2();
        let local = move |pos: Pos2| pos - origin;

        if sample.pressed && !self.touching {
            if let Some(pos) = sample.pos.filter(|p| self.view_rect.contains(*p)) {
                self.touching = true;
                self.last_pos = Some(pos);
                events.push(TouchEvent::Down(local(pos)));
            }
        } else if self.touching {
            match sample.pos {
                Some(pos) if sample.released || !sample.down => {
                    events.push(TouchEvent::Up(local(pos)));
                    self.touching = false;
                    self.last_pos = None;
                }
                Some(pos) => {
                    if self.last_pos != Some(pos) {
                        events.push(TouchEvent::Move(local(pos)));
                        self.last_pos = Some(pos);
                    }
                }
                None => {
                    events.push(TouchEvent::Cancel);
                    self.touching = false;
                    self.last_pos = None;
                }
            }
        }

        events
    }
}
