use domlens_core::SelectionSnapshot;

/// Canonical inspection state. Owned by the coordinator task and mutated
/// only inside its message-handling turn; no other context can reach it.
/// Lives exactly as long as the background context does; never persisted.
#[derive(Debug, Default)]
pub struct InspectionSession {
    is_highlighting: bool,
    selected_elements: Vec<SelectionSnapshot>,
}

impl InspectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighting(&self) -> bool {
        self.is_highlighting
    }

    pub fn set_highlighting(&mut self, next: bool) {
        self.is_highlighting = next;
    }

    /// Records a capture. Appends to the running list and drops out of
    /// inspection mode: selection is one-shot.
    pub fn add_selection(&mut self, snapshot: SelectionSnapshot) {
        self.selected_elements.push(snapshot);
        self.is_highlighting = false;
    }

    /// The live selection: only the most recent capture is ever consumed.
    pub fn selection(&self) -> Option<&SelectionSnapshot> {
        self.selected_elements.last()
    }

    pub fn capture_count(&self) -> usize {
        self.selected_elements.len()
    }
}
