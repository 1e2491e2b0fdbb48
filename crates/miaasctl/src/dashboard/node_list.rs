//! Node List Renderer - empty state or one card per node, in received order

use super::node_card::NodeCardView;
use miaas_common::Node;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const EMPTY_MESSAGE: &str = "No nodes registered yet.";
pub const EMPTY_HINT: &str = "Register a node to see it appear here.";

#[derive(Debug, Clone, PartialEq)]
pub enum NodeListView {
    Empty,
    Cards(Vec<NodeCardView>),
}

impl NodeListView {
    /// No sorting and no filtering: card `i` is node `i`.
    pub fn project(nodes: &[Node]) -> Self {
        if nodes.is_empty() {
            NodeListView::Empty
        } else {
            NodeListView::Cards(nodes.iter().map(NodeCardView::from).collect())
        }
    }

    pub fn card_count(&self) -> usize {
        match self {
            NodeListView::Empty => 0,
            NodeListView::Cards(cards) => cards.len(),
        }
    }
}

/// Rendered lines plus the line range `[start, end)` of the selected card.
pub struct ListLines {
    pub lines: Vec<Line<'static>>,
    pub selected_span: (usize, usize),
}

pub fn list_lines(view: &NodeListView, selected: usize, width: usize) -> ListLines {
    match view {
        NodeListView::Empty => ListLines {
            lines: vec![
                Line::from(""),
                Line::from(Span::raw(format!("  {}", EMPTY_MESSAGE))),
                Line::from(Span::styled(
                    format!("  {}", EMPTY_HINT),
                    Style::default().fg(Color::Rgb(140, 140, 140)),
                )),
            ],
            selected_span: (0, 0),
        },
        NodeListView::Cards(cards) => {
            let mut lines = Vec::new();
            let mut selected_span = (0, 0);

            for (i, card) in cards.iter().enumerate() {
                let start = lines.len();
                lines.extend(card.lines(width, i == selected));
                if i == selected {
                    selected_span = (start, lines.len());
                }
            }

            ListLines {
                lines,
                selected_span,
            }
        }
    }
}

/// Scroll offset that keeps the selected card on screen, top-aligned when it
/// does not fit.
pub fn scroll_for_selection(span: (usize, usize), visible: usize) -> usize {
    let (start, end) = span;
    let height = end.saturating_sub(start);
    if visible == 0 || height >= visible {
        return start;
    }
    end.saturating_sub(visible)
}

/// Paragraph scroll is a u16; saturate rather than wrap on huge lists
fn scroll_offset(scroll: usize) -> u16 {
    u16::try_from(scroll).unwrap_or(u16::MAX)
}

pub fn draw_node_list(f: &mut Frame, area: Rect, nodes: &[Node], selected: usize) {
    let view = NodeListView::project(nodes);
    let content_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let ListLines {
        lines,
        selected_span,
    } = list_lines(&view, selected, content_width);
    let scroll = scroll_for_selection(selected_span, visible);

    let title = match view.card_count() {
        0 => " Nodes ".to_string(),
        n => format!(" Nodes ({}) ", n),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(80, 180, 255))),
        )
        .scroll((scroll_offset(scroll), 0));

    f.render_widget(paragraph, area);
}
