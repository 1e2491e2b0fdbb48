//! Layout - dashboard grid computation
//!
//! Header on top, status bar at the bottom, node panel in between. On very
//! short terminals the header shrinks to a single line before the node panel
//! loses space.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub body: Rect,
    pub status_bar: Rect,
}

const FULL_HEADER_HEIGHT: u16 = 3;
const COMPACT_HEADER_HEIGHT: u16 = 1;
const STATUS_BAR_HEIGHT: u16 = 1;
const MIN_BODY_HEIGHT: u16 = 8;

pub fn compute_layout(frame_area: Rect) -> DashboardLayout {
    let header_height =
        if frame_area.height >= FULL_HEADER_HEIGHT + STATUS_BAR_HEIGHT + MIN_BODY_HEIGHT {
            FULL_HEADER_HEIGHT
        } else {
            COMPACT_HEADER_HEIGHT
        };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame_area);

    DashboardLayout {
        header: chunks[0],
        body: chunks[1],
        status_bar: chunks[2],
    }
}

/// Compose the status bar text, dropping segments from the right until it fits.
///
/// Format: `4 nodes | 2 online | 1 offline | 1 pending | Updated 15:42:08 | r refresh  F1 help  q quit`
pub fn compose_status_bar_text(width: u16, segments: &[String]) -> String {
    let max = width.saturating_sub(2) as usize;
    let mut count = segments.len();

    while count > 0 {
        let text = segments[..count].join(" | ");
        if text.chars().count() <= max {
            return text;
        }
        count -= 1;
    }

    String::new()
}
