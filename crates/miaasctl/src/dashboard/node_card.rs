//! Node Card Renderer - one node record projected to display values and lines

use super::utils::wrap_tags;
use miaas_common::format::{capability_tags, format_last_seen, short_id};
use miaas_common::{Liveness, Node};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Status indicator colors
pub const POSITIVE: Color = Color::Rgb(74, 222, 128);
pub const NEGATIVE: Color = Color::Rgb(239, 68, 68);
pub const NEUTRAL: Color = Color::Rgb(251, 191, 36);

const LABEL_WIDTH: usize = 12;
const INDENT: &str = "  ";

pub fn status_color(liveness: Liveness) -> Color {
    match liveness {
        Liveness::Online => POSITIVE,
        Liveness::Offline => NEGATIVE,
        Liveness::Pending => NEUTRAL,
    }
}

/// Display values for one card. Built fresh from the node on every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCardView {
    /// Full id, used as the card key
    pub key: String,
    pub name: String,
    pub short_id: String,
    pub ip: String,
    pub status: String,
    pub liveness: Liveness,
    pub last_seen: String,
    /// `None` when the node reported no capabilities at all
    pub capabilities: Option<Vec<String>>,
}

impl From<&Node> for NodeCardView {
    fn from(node: &Node) -> Self {
        Self {
            key: node.id.clone(),
            name: node.name.clone(),
            short_id: short_id(&node.id),
            ip: node.ip.clone(),
            status: node.status_text().to_string(),
            liveness: node.liveness(),
            last_seen: format_last_seen(node.last_seen),
            capabilities: node
                .capabilities
                .as_ref()
                .map(|caps| capability_tags(Some(caps))),
        }
    }
}

impl NodeCardView {
    pub fn color(&self) -> Color {
        status_color(self.liveness)
    }

    /// Lines for this card at the given content width, including the
    /// trailing spacer line.
    pub fn lines(&self, width: usize, selected: bool) -> Vec<Line<'static>> {
        let title_style = if selected {
            Style::default()
                .fg(Color::Rgb(150, 200, 255))
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
                .fg(Color::Rgb(150, 200, 255))
                .add_modifier(Modifier::BOLD)
        };

        let mut lines = vec![Line::from(vec![
            Span::raw(if selected { "> " } else { "  " }),
            Span::styled("● ", Style::default().fg(self.color())),
            Span::styled(self.name.clone(), title_style),
        ])];

        lines.push(detail_line("ID:", &self.short_id));
        lines.push(detail_line("IP:", &self.ip));
        lines.push(detail_line("Status:", &self.status));
        lines.push(detail_line("Last Seen:", &self.last_seen));

        if let Some(tags) = &self.capabilities {
            lines.push(Line::from(Span::styled(
                format!("{}{}Capabilities:", INDENT, INDENT),
                label_style(),
            )));
            let tag_width = width.saturating_sub(INDENT.len() * 3);
            let framed: Vec<String> = tags.iter().map(|t| format!("[{}]", t)).collect();
            for row in wrap_tags(&framed, tag_width) {
                lines.push(Line::from(Span::styled(
                    format!("{}{}{}{}", INDENT, INDENT, INDENT, row),
                    Style::default().fg(Color::Rgb(180, 180, 255)),
                )));
            }
        }

        lines.push(Line::from(""));
        lines
    }
}

fn label_style() -> Style {
    Style::default().fg(Color::Rgb(140, 140, 140))
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}{}{:<width$}", INDENT, INDENT, label, width = LABEL_WIDTH),
            label_style(),
        ),
        Span::raw(value.to_string()),
    ])
}
