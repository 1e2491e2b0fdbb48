//! Interaction state - selection cursor and overlays
//!
//! Separate from `ViewState`: nothing here comes from the control-plane.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Index of the highlighted card
    pub selected: usize,

    /// Whether the help overlay is shown
    pub show_help: bool,
}

impl UiState {
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may have shrunk after a refresh
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
