//! Plain terminal output for the one-shot `nodes` and `node` commands
//!
//! Uses the same card projection as the dashboard so both surfaces agree on
//! ids, timestamps and capability tags.

use crate::dashboard::node_card::NodeCardView;
use crate::dashboard::node_list::{EMPTY_HINT, EMPTY_MESSAGE};
use miaas_common::{Liveness, Node};
use owo_colors::OwoColorize;
use std::fmt::Write;

fn status_dot(liveness: Liveness) -> String {
    match liveness {
        Liveness::Online => "●".truecolor(74, 222, 128).to_string(),
        Liveness::Offline => "●".truecolor(239, 68, 68).to_string(),
        Liveness::Pending => "●".truecolor(251, 191, 36).to_string(),
    }
}

/// Render one card as indented text
pub fn format_card(card: &NodeCardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", status_dot(card.liveness), card.name.bold());
    let _ = writeln!(out, "    {:<12}{}", "ID:", card.short_id);
    let _ = writeln!(out, "    {:<12}{}", "IP:", card.ip);
    let _ = writeln!(out, "    {:<12}{}", "Status:", card.status);
    let _ = writeln!(out, "    {:<12}{}", "Last Seen:", card.last_seen);

    if let Some(tags) = &card.capabilities {
        let _ = writeln!(out, "    Capabilities:");
        for tag in tags {
            let _ = writeln!(out, "      [{}]", tag.cyan());
        }
    }
    out
}

/// Render the node list, or the empty-state message
pub fn format_node_list(nodes: &[Node]) -> String {
    if nodes.is_empty() {
        return format!("{}\n{}\n", EMPTY_MESSAGE, EMPTY_HINT.dimmed());
    }

    nodes
        .iter()
        .map(|node| format_card(&NodeCardView::from(node)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_node_list(nodes: &[Node]) {
    print!("{}", format_node_list(nodes));
}

pub fn print_node(node: &Node) {
    print!("{}", format_card(&NodeCardView::from(node)));
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
