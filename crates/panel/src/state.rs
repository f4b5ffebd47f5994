use std::collections::HashSet;

use domlens_core::SelectionSnapshot;

/// Panel-local UI state. The expanded set is purely local; the
/// coordinator never sees or restores it.
#[derive(Debug, Default)]
pub struct PanelState {
    pub is_highlighting: bool,
    pub selection: Option<SelectionSnapshot>,
    expanded: HashSet<String>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the coordinator's `getState` reply on panel startup.
    pub fn apply_init(&mut self, is_highlighting: bool, selection: Option<SelectionSnapshot>) {
        self.is_highlighting = is_highlighting;
        self.selection = selection;
    }

    /// Applies a selection push from the page context. A capture always
    /// ends inspection mode.
    pub fn apply_selection(&mut self, selection: SelectionSnapshot) {
        self.selection = Some(selection);
        self.is_highlighting = false;
    }

    /// Flips inspection mode locally and, when newly enabling, clears the
    /// displayed selection before any confirmation arrives.
    /// Returns the new state to request from the coordinator.
    pub fn toggle_inspection(&mut self) -> bool {
        self.is_highlighting = !self.is_highlighting;
        if self.is_highlighting {
            self.selection = None;
        }
        self.is_highlighting
    }

    pub fn toggle_expanded(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }
}
