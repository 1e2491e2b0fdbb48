//! Fetch controller lifecycle: initial load, refresh, failures

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use miaas_common::{ControlPlaneClient, DashboardConfig, FetchError, Node, NodeSource};
use miaasctl::dashboard::{DashboardMessage, FetchController, Presentation};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Replays canned results in call order; the last one repeats.
struct ScriptedSource {
    calls: AtomicUsize,
    results: Vec<Result<Vec<Node>, FetchError>>,
}

impl ScriptedSource {
    fn new(results: Vec<Result<Vec<Node>, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            results,
        })
    }
}

impl NodeSource for ScriptedSource {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, FetchError>> + Send {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.results[i.min(self.results.len() - 1)].clone();
        async move { result }
    }
}

fn node(id: &str, name: &str, status: &str) -> Node {
    Node {
        id: id.to_string(),
        name: name.to_string(),
        ip: "192.168.1.10".to_string(),
        status: Some(status.to_string()),
        last_seen: Some(1_700_000_000.0),
        capabilities: None,
    }
}

async fn settle_next<S: NodeSource>(
    controller: &mut FetchController<S>,
    rx: &mut mpsc::Receiver<DashboardMessage>,
) -> bool {
    let msg = rx.recv().await.expect("fetch task dropped its sender");
    controller.handle_message(msg)
}

#[tokio::test]
async fn test_initialize_fetches_once() {
    let source = ScriptedSource::new(vec![Ok(vec![node("a", "worker-01", "online")])]);
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(source.clone(), "http://localhost:8000", tx);

    assert!(controller.initialize().is_some());
    assert!(controller.initialize().is_none());
    assert!(controller.state().is_loading());

    assert!(settle_next(&mut controller, &mut rx).await);

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(!controller.state().is_loading());
    match controller.state().presentation() {
        Presentation::Nodes(nodes) => assert_eq!(nodes[0].name, "worker-01"),
        other => panic!("unexpected presentation {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_sets_loading_and_clears_error() {
    let source = ScriptedSource::new(vec![
        Err(FetchError::Status(503)),
        Ok(vec![node("a", "worker-01", "online")]),
    ]);
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(source, "http://localhost:8000", tx);

    controller.initialize();
    settle_next(&mut controller, &mut rx).await;
    assert!(controller.state().error().unwrap().contains("503"));

    controller.refresh();
    assert!(controller.state().is_loading());
    assert_eq!(controller.state().error(), None);
    assert_eq!(controller.state().presentation(), Presentation::Loading);

    settle_next(&mut controller, &mut rx).await;
    assert_eq!(controller.state().nodes().len(), 1);
}

#[tokio::test]
async fn test_network_failure_keeps_previous_nodes() {
    let source = ScriptedSource::new(vec![
        Ok(vec![
            node("a", "worker-01", "online"),
            node("b", "worker-02", "offline"),
        ]),
        Err(FetchError::Transport("connection refused".to_string())),
    ]);
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(source, "http://localhost:8000", tx);

    controller.initialize();
    settle_next(&mut controller, &mut rx).await;
    controller.refresh();
    settle_next(&mut controller, &mut rx).await;

    assert!(!controller.state().is_loading());
    assert_eq!(controller.state().error(), Some("connection refused"));
    assert_eq!(controller.state().nodes().len(), 2);
    assert!(matches!(
        controller.state().presentation(),
        Presentation::Error(_)
    ));
}

#[tokio::test]
async fn test_overlapping_refreshes_only_latest_applies() {
    let source = ScriptedSource::new(vec![Ok(vec![node("a", "worker-01", "online")])]);
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(source, "http://localhost:8000", tx);

    let first = controller.refresh();
    let second = controller.refresh();
    assert!(second > first);

    let mut applied = 0;
    for _ in 0..2 {
        if settle_next(&mut controller, &mut rx).await {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(controller.latest_cycle(), second);
    assert!(!controller.state().is_loading());
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base: &str) -> Arc<ControlPlaneClient> {
    let config = DashboardConfig::default().with_cli_override(Some(base.to_string()));
    Arc::new(ControlPlaneClient::new(&config).unwrap())
}

#[tokio::test]
async fn test_http_500_surfaces_status() {
    let app = Router::new().route(
        "/api/v1/nodes",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_server(app).await;
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(client_for(&base), base.clone(), tx);

    controller.initialize();
    settle_next(&mut controller, &mut rx).await;

    let error = controller.state().error().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("500"));
    assert!(!controller.state().is_loading());
    assert!(matches!(
        controller.state().presentation(),
        Presentation::Error(_)
    ));
}

#[tokio::test]
async fn test_http_success_end_to_end() {
    let app = Router::new().route(
        "/api/v1/nodes",
        get(|| async {
            Json(json!([
                {"id": "n-2", "name": "worker-02", "ip": "10.0.0.2", "status": "offline", "last_seen": 0},
                {"id": "n-1", "name": "worker-01", "ip": "10.0.0.1", "status": "online", "last_seen": 1700000000}
            ]))
        }),
    );
    let base = spawn_server(app).await;
    let (tx, mut rx) = mpsc::channel(8);
    let mut controller = FetchController::new(client_for(&base), base.clone(), tx);

    controller.initialize();
    settle_next(&mut controller, &mut rx).await;

    let names: Vec<&str> = controller
        .state()
        .nodes()
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(names, vec!["worker-02", "worker-01"]);
    assert_eq!(controller.state().error(), None);
}
