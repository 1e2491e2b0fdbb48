//! Utilities - tag wrapping and the help overlay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Pack tags into rows no wider than `width`, separated by single spaces.
/// A tag wider than the row gets a row of its own; tags are never split.
pub fn wrap_tags(tags: &[String], width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();

    for tag in tags {
        let current_width = current.chars().count();
        let tag_width = tag.chars().count();

        if !current.is_empty() && width > 0 && current_width + 1 + tag_width > width {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(tag);
    }

    if !current.is_empty() {
        rows.push(current);
    }

    rows
}

/// Draw help overlay
pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<10}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("r / F5", " - Refresh nodes"),
        key("↑/↓ j/k", " - Select node"),
        key("Home/End", " - First / last node"),
        key("F1 / ?", " - Toggle help"),
        key("q / Esc", " - Quit"),
        key("Ctrl+C", " - Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press F1 to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    let help_area = centered_rect(50, 50, area);

    let help_block = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, help_area);
    f.render_widget(help_block, help_area);
}

/// Create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
