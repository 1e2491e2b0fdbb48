//! Dashboard rendering against ratatui's TestBackend

use miaas_common::node::{CapabilityValue, Capabilities};
use miaas_common::{FetchError, Node, NodeSource};
use miaasctl::dashboard::render::draw_ui;
use miaasctl::dashboard::{FetchController, UiState, ViewState};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

const BASE_URL: &str = "http://localhost:8000";

struct Unused;

impl NodeSource for Unused {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, FetchError>> + Send {
        async { Ok(Vec::new()) }
    }
}

/// Drive a controller through the given settled outcomes, without spawning
fn controller_after(outcomes: Vec<Result<Vec<Node>, FetchError>>) -> FetchController<Unused> {
    let (tx, _rx) = mpsc::channel(1);
    let mut controller = FetchController::new(Arc::new(Unused), BASE_URL, tx);
    for outcome in outcomes {
        let cycle = controller.begin_cycle();
        controller.settle(cycle, outcome);
    }
    controller
}

fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(view: &ViewState, ui: &UiState) -> String {
    let backend = TestBackend::new(100, 48);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| draw_ui(f, view, ui, BASE_URL)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn node(id: &str, name: &str, status: Option<&str>, last_seen: Option<f64>) -> Node {
    Node {
        id: id.to_string(),
        name: name.to_string(),
        ip: "192.168.1.10".to_string(),
        status: status.map(str::to_string),
        last_seen,
        capabilities: None,
    }
}

#[test]
fn test_loading_panel() {
    let controller = controller_after(vec![]);
    let text = render(controller.state(), &UiState::default());

    assert!(text.contains("MIaaS Control Plane"));
    assert!(text.contains("Loading nodes..."));
    assert!(!text.contains("No nodes registered yet."));
}

#[test]
fn test_empty_state() {
    let controller = controller_after(vec![Ok(vec![])]);
    let text = render(controller.state(), &UiState::default());

    assert!(text.contains("No nodes registered yet."));
    assert!(text.contains("Register a node to see it appear here."));
    assert_eq!(text.matches("Last Seen:").count(), 0);
}

#[test]
fn test_one_card_per_node_in_order() {
    let nodes = vec![
        node("cccccccc-0003", "gamma", Some("online"), Some(1_700_000_000.0)),
        node("aaaaaaaa-0001", "alpha", Some("offline"), None),
        node("bbbbbbbb-0002", "beta", Some("degraded"), Some(0.0)),
    ];
    let controller = controller_after(vec![Ok(nodes)]);
    let text = render(controller.state(), &UiState::default());

    assert_eq!(text.matches("Last Seen:").count(), 3);

    let gamma = text.find("gamma").unwrap();
    let alpha = text.find("alpha").unwrap();
    let beta = text.find("beta").unwrap();
    assert!(gamma < alpha && alpha < beta);

    assert!(text.contains("cccccccc..."));
    assert_eq!(text.matches("Never").count(), 2);
    assert!(text.contains("3 nodes | 1 online | 1 offline | 1 pending"));
}

#[test]
fn test_capability_tags_rendered() {
    let mut n = node("abcdef1234567890", "worker-01", Some("online"), None);
    n.capabilities = Some(Capabilities::new(vec![
        ("os".to_string(), CapabilityValue::Text("linux".to_string())),
        ("cpu_count".to_string(), CapabilityValue::from(json!(8))),
        ("gpus".to_string(), CapabilityValue::from(json!([{"model": "A100"}]))),
    ]));
    let controller = controller_after(vec![Ok(vec![n])]);
    let text = render(controller.state(), &UiState::default());

    assert!(text.contains("abcdef12..."));
    assert!(text.contains("[os: linux]"));
    assert!(text.contains("[cpu_count: 8]"));
    assert!(text.contains(r#"[gpus: [{"model":"A100"}]]"#));
}

#[test]
fn test_error_hides_stale_cards() {
    let controller = controller_after(vec![
        Ok(vec![node("a", "worker-01", Some("online"), None)]),
        Err(FetchError::Status(500)),
    ]);
    assert_eq!(controller.state().nodes().len(), 1);

    let text = render(controller.state(), &UiState::default());

    assert!(text.contains("Error: HTTP error: status 500"));
    assert!(text.contains("Make sure the control-plane is running at http://localhost:8000"));
    assert!(!text.contains("worker-01"));
    assert_eq!(text.matches("Last Seen:").count(), 0);
}

#[test]
fn test_help_overlay() {
    let controller = controller_after(vec![Ok(vec![])]);
    let ui = UiState {
        show_help: true,
        ..UiState::default()
    };
    let text = render(controller.state(), &ui);
    assert!(text.contains("Keyboard Shortcuts"));
}

#[test]
fn test_selection_scrolls_into_view() {
    let nodes: Vec<Node> = (0..12)
        .map(|i| node(&format!("node-{:02}", i), &format!("worker-{:02}", i), Some("online"), None))
        .collect();
    let controller = controller_after(vec![Ok(nodes)]);
    let ui = UiState {
        selected: 11,
        ..UiState::default()
    };
    let text = render(controller.state(), &ui);

    assert!(text.contains("worker-11"));
    assert!(!text.contains("worker-00"));
}
