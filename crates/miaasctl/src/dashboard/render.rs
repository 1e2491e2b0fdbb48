//! Rendering - header, node panel and status bar
//!
//! Reads a snapshot of the view state; never mutates it.

use super::controller::{Presentation, ViewState};
use super::layout::{self, compose_status_bar_text};
use super::node_card::{NEGATIVE, NEUTRAL, POSITIVE};
use super::node_list::draw_node_list;
use super::state::UiState;
use super::utils::draw_help_overlay;
use miaas_common::{Liveness, Node};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const TITLE: &str = "MIaaS Control Plane";
pub const SUBTITLE: &str = "Model Infrastructure as a Service";
pub const LOADING_MESSAGE: &str = "Loading nodes...";

pub fn error_hint(base_url: &str) -> String {
    format!("Make sure the control-plane is running at {}", base_url)
}

/// Draw the whole dashboard
pub fn draw_ui(f: &mut Frame, view: &ViewState, ui: &UiState, base_url: &str) {
    let size = f.size();
    let grid = layout::compute_layout(size);

    draw_header(f, grid.header, base_url);

    match view.presentation() {
        Presentation::Loading => draw_loading(f, grid.body),
        Presentation::Error(message) => draw_error(f, grid.body, message, base_url),
        Presentation::Nodes(nodes) => draw_node_list(f, grid.body, nodes, ui.selected),
    }

    draw_status_bar(f, grid.status_bar, view);

    if ui.show_help {
        draw_help_overlay(f, size);
    }
}

pub fn draw_header(f: &mut Frame, area: Rect, base_url: &str) {
    let title = Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Rgb(150, 200, 255))
            .add_modifier(Modifier::BOLD),
    );
    let dim = Style::default().fg(Color::Rgb(140, 140, 140));

    let lines = if area.height >= 3 {
        vec![
            Line::from(vec![Span::raw(" "), title]),
            Line::from(Span::styled(format!(" {}", SUBTITLE), dim)),
            Line::from(Span::styled(format!(" API: {}", base_url), dim)),
        ]
    } else {
        vec![Line::from(vec![
            Span::raw(" "),
            title,
            Span::styled(format!(" | {}", base_url), dim),
        ])]
    };

    let header = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(header, area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(80, 180, 255)))
}

fn draw_loading(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", LOADING_MESSAGE),
            Style::default().fg(Color::Rgb(180, 180, 180)),
        )),
    ])
    .block(panel(" Nodes "));

    f.render_widget(paragraph, area);
}

fn draw_error(f: &mut Frame, area: Rect, message: &str, base_url: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Error: {}", message),
            Style::default().fg(NEGATIVE).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", error_hint(base_url)),
            Style::default().fg(Color::Rgb(180, 180, 180)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press r to retry.",
            Style::default().fg(Color::Rgb(140, 140, 140)),
        )),
    ])
    .wrap(Wrap { trim: false })
    .block(panel(" Nodes "));

    f.render_widget(paragraph, area);
}

/// Per-liveness tallies for the status bar
pub fn liveness_counts(nodes: &[Node]) -> (usize, usize, usize) {
    nodes
        .iter()
        .fold((0, 0, 0), |(on, off, pending), node| match node.liveness() {
            Liveness::Online => (on + 1, off, pending),
            Liveness::Offline => (on, off + 1, pending),
            Liveness::Pending => (on, off, pending + 1),
        })
}

fn status_segments(view: &ViewState) -> (Vec<String>, Color) {
    let mut segments = Vec::new();

    let color = match view.presentation() {
        Presentation::Loading => {
            segments.push("Loading...".to_string());
            NEUTRAL
        }
        Presentation::Error(_) => {
            segments.push("Fetch failed".to_string());
            NEGATIVE
        }
        Presentation::Nodes(nodes) => {
            let (online, offline, pending) = liveness_counts(nodes);
            segments.push(match nodes.len() {
                1 => "1 node".to_string(),
                n => format!("{} nodes", n),
            });
            segments.push(format!("{} online", online));
            segments.push(format!("{} offline", offline));
            segments.push(format!("{} pending", pending));
            POSITIVE
        }
    };

    if let Some(at) = view.last_refreshed() {
        segments.push(format!("Updated {}", at.format("%H:%M:%S")));
    }
    segments.push("r refresh  F1 help  q quit".to_string());

    (segments, color)
}

pub fn draw_status_bar(f: &mut Frame, area: Rect, view: &ViewState) {
    let (segments, color) = status_segments(view);
    let text = compose_status_bar_text(area.width.saturating_sub(1), &segments);

    let status_text = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(color)),
        Span::styled(text, Style::default().fg(Color::Rgb(180, 180, 180))),
    ]);

    let status_bar = Paragraph::new(status_text).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(status_bar, area);
}
