//! Dashboard - terminal node inventory
//!
//! - controller: fetch cycles and the loading / error / data view state
//! - node_list: empty state or the ordered list of cards
//! - node_card: per-node projection and styling
//! - render: header, panels and status bar
//! - layout: screen grid
//! - state: selection cursor and help overlay
//! - event_loop: terminal setup and key handling
//! - utils: tag wrapping and overlays

pub mod controller;
mod event_loop;
pub mod layout;
pub mod node_card;
pub mod node_list;
pub mod render;
pub mod state;
mod utils;

// Re-export main entry point
pub use event_loop::{key_action, run, KeyAction};

pub use controller::{CycleId, DashboardMessage, FetchController, Presentation, ViewState};
pub use state::UiState;
