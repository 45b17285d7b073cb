use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{ImageStateModel, StateEntry};
use crate::loader::ViewId;

/// Lowest value a filter parameter can take
pub const PARAMETER_MIN: i32 = -100;
/// Highest value a filter parameter can take
pub const PARAMETER_MAX: i32 = 100;

/// Shared handle to a filter; the preset owns it, views observe it.
pub type FilterHandle = Rc<RefCell<ImageFilter>>;
/// Shared handle to a preset, held by the active view and the history list.
pub type PresetHandle = Rc<RefCell<ImagePreset>>;

/// What a filter does to the image. The pixel math lives with the loader's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Brightness,
    Contrast,
    Hue,
    Custom,
}

/// A single adjustable operation with one integer parameter in [-100, 100].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFilter {
    name: String,
    kind: FilterKind,
    parameter: i32,
}

impl ImageFilter {
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parameter: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn parameter(&self) -> i32 {
        self.parameter
    }

    /// Stores the parameter, clamped to the supported range.
    pub fn set_parameter(&mut self, value: i32) {
        self.parameter = value.clamp(PARAMETER_MIN, PARAMETER_MAX);
    }

    /// A filter at its neutral value leaves the image untouched
    pub fn is_nil(&self) -> bool {
        self.parameter == 0
    }

    pub fn into_handle(self) -> FilterHandle {
        Rc::new(RefCell::new(self))
    }
}

/// Ordered list of filter operations plus a display name.
#[derive(Debug)]
pub struct ImagePreset {
    id: Uuid,
    name: String,
    filters: Vec<FilterHandle>,
    render_target: Option<ViewId>,
}

impl ImagePreset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            filters: Vec::new(),
            render_target: None,
        }
    }

    /// Builder-style helper for assembling presets
    pub fn with_filter(mut self, filter: ImageFilter) -> Self {
        self.filters.push(filter.into_handle());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a filter and returns the handle shared with the caller
    pub fn add_filter(&mut self, filter: ImageFilter) -> FilterHandle {
        let handle = filter.into_handle();
        self.filters.push(Rc::clone(&handle));
        handle
    }

    pub fn filters(&self) -> &[FilterHandle] {
        &self.filters
    }

    pub fn filter_named(&self, name: &str) -> Option<FilterHandle> {
        self.filters
            .iter()
            .find(|f| f.borrow().name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn set_render_target(&mut self, target: ViewId) {
        self.render_target = Some(target);
    }

    pub fn render_target(&self) -> Option<ViewId> {
        self.render_target
    }

    /// Deep copy with fresh filter handles and a new id, so edits to the copy never
    /// reach the original. The render target is not carried over.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            filters: self
                .filters
                .iter()
                .map(|f| f.borrow().clone().into_handle())
                .collect(),
            render_target: None,
        }
    }

    /// Same name and same filters with the same parameters, in the same order.
    pub fn is_same_as(&self, other: &ImagePreset) -> bool {
        self.name == other.name
            && self.filters.len() == other.filters.len()
            && self
                .filters
                .iter()
                .zip(&other.filters)
                .all(|(a, b)| *a.borrow() == *b.borrow())
    }

    /// Replaces the contents of the state model with one entry per operation.
    pub fn fill_state_model(&self, model: &mut ImageStateModel) {
        model.clear();
        for filter in &self.filters {
            let filter = filter.borrow();
            model.push(StateEntry {
                name: filter.name().to_owned(),
                parameter: filter.parameter(),
            });
        }
    }

    pub fn into_handle(self) -> PresetHandle {
        Rc::new(RefCell::new(self))
    }
}
