//! Fetch Controller - request lifecycle and the loading / error / data state
//!
//! Each fetch cycle gets a `CycleId`. Requests run on spawned tasks and report
//! back through the dashboard channel; the event loop hands the outcome to
//! [`FetchController::settle`], which is the only place `ViewState` changes
//! after a cycle begins. Outcomes from superseded cycles are dropped.

use chrono::{DateTime, Local};
use miaas_common::node::dedupe_by_id;
use miaas_common::{FetchError, Node, NodeSource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Identifies one fetch cycle. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleId(u64);

impl CycleId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Messages delivered to the dashboard event loop
#[derive(Debug)]
pub enum DashboardMessage {
    FetchSettled {
        cycle: CycleId,
        result: Result<Vec<Node>, FetchError>,
    },
}

/// What the node panel should show right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation<'a> {
    Loading,
    Error(&'a str),
    Nodes(&'a [Node]),
}

/// View state owned by the controller.
///
/// `nodes` keeps the last successful collection even while a later cycle is
/// loading or has failed; it is just not presented then.
#[derive(Debug, Clone)]
pub struct ViewState {
    nodes: Vec<Node>,
    loading: bool,
    error: Option<String>,
    last_refreshed: Option<DateTime<Local>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Starts out loading: the initial cycle is issued as soon as the
    /// dashboard comes up.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            loading: true,
            error: None,
            last_refreshed: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    /// Exactly one of loading, error or data; loading wins, then error.
    pub fn presentation(&self) -> Presentation<'_> {
        if self.loading {
            Presentation::Loading
        } else if let Some(error) = &self.error {
            Presentation::Error(error)
        } else {
            Presentation::Nodes(&self.nodes)
        }
    }
}

/// Owns the view state and issues fetch cycles against a [`NodeSource`].
pub struct FetchController<S: NodeSource> {
    source: Arc<S>,
    base_url: String,
    tx: mpsc::Sender<DashboardMessage>,
    state: ViewState,
    latest: CycleId,
    initialized: bool,
}

impl<S: NodeSource> FetchController<S> {
    pub fn new(
        source: Arc<S>,
        base_url: impl Into<String>,
        tx: mpsc::Sender<DashboardMessage>,
    ) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            tx,
            state: ViewState::new(),
            latest: CycleId(0),
            initialized: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Base URL named in the error hint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn latest_cycle(&self) -> CycleId {
        self.latest
    }

    /// Issue the startup fetch. Only the first call does anything.
    pub fn initialize(&mut self) -> Option<CycleId> {
        if self.initialized {
            debug!("initialize() called again, ignoring");
            return None;
        }
        self.initialized = true;
        Some(self.refresh())
    }

    /// Start a new fetch cycle. Cycles already in flight are not cancelled;
    /// their results will be discarded when they settle.
    pub fn refresh(&mut self) -> CycleId {
        let cycle = self.begin_cycle();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = source.list_nodes().await;
            if tx
                .send(DashboardMessage::FetchSettled { cycle, result })
                .await
                .is_err()
            {
                debug!(cycle = cycle.value(), "dashboard gone before fetch settled");
            }
        });

        cycle
    }

    /// Mark a new cycle as outstanding: loading on, error cleared.
    pub fn begin_cycle(&mut self) -> CycleId {
        self.latest = CycleId(self.latest.0 + 1);
        self.state.loading = true;
        self.state.error = None;
        debug!(cycle = self.latest.value(), "fetch cycle started");
        self.latest
    }

    /// Apply a cycle's outcome. Returns false when the cycle was superseded
    /// and the outcome was dropped.
    pub fn settle(&mut self, cycle: CycleId, result: Result<Vec<Node>, FetchError>) -> bool {
        if cycle != self.latest {
            debug!(
                cycle = cycle.value(),
                latest = self.latest.value(),
                "dropping result of superseded fetch cycle"
            );
            return false;
        }

        match result {
            Ok(nodes) => {
                info!(cycle = cycle.value(), count = nodes.len(), "fetched nodes");
                self.state.nodes = dedupe_by_id(nodes);
                self.state.last_refreshed = Some(Local::now());
            }
            Err(err) => {
                warn!(cycle = cycle.value(), "error fetching nodes: {}", err);
                self.state.error = Some(err.to_string());
            }
        }

        self.state.loading = false;
        true
    }

    pub fn handle_message(&mut self, message: DashboardMessage) -> bool {
        match message {
            DashboardMessage::FetchSettled { cycle, result } => self.settle(cycle, result),
        }
    }
}
