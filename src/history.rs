use std::rc::Rc;

use crate::preset::PresetHandle;

/// Ordered list of presets the user has installed, newest first.
///
/// Backs the history list widget. Entries are shared handles; selecting an entry
/// installs a copy so later edits do not rewrite history.
#[derive(Debug, Default)]
pub struct HistoryModel {
    /// Installed presets, index 0 is the most recent
    entries: Vec<PresetHandle>,
    /// Entry the canvas currently shows, if any
    current: Option<usize>,
}

impl HistoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a preset at `index` (clamped to the end) and marks it current.
    pub fn insert(&mut self, preset: PresetHandle, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, preset);
        self.current = Some(index);
    }

    pub fn get(&self, index: usize) -> Option<PresetHandle> {
        self.entries.get(index).map(Rc::clone)
    }

    /// Marks `index` as the entry being shown. Out-of-range indices are ignored.
    pub fn set_current(&mut self, index: usize) {
        if index < self.entries.len() {
            self.current = Some(index);
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names in list order
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|p| p.borrow().name().to_owned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }
}

/// One row of the image-state list: an operation and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub name: String,
    pub parameter: i32,
}

/// Textual list of the active preset's operations.
#[derive(Debug, Default)]
pub struct ImageStateModel {
    entries: Vec<StateEntry>,
}

impl ImageStateModel {
    pub fn push(&mut self, entry: StateEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, index: usize) -> Option<&StateEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
