//! Control-plane HTTP client
//!
//! Read-only: `GET /api/v1/nodes` and `GET /api/v1/nodes/{id}`. Response
//! bodies of failed requests are never inspected, only the status code.

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::node::Node;
use reqwest::Url;
use std::future::Future;
use tracing::debug;

const NODES_PATH: [&str; 3] = ["api", "v1", "nodes"];

/// Anything that can produce the node collection for a fetch cycle.
pub trait NodeSource: Send + Sync + 'static {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, FetchError>> + Send;
}

/// reqwest-backed client for the control-plane API
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ControlPlaneClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(config.base_url())
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url(), e)))?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url().to_string()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("miaas-dashboard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v1/nodes`
    pub fn nodes_url(&self) -> Url {
        self.endpoint(&[])
    }

    /// `{base}/api/v1/nodes/{id}`, with the id percent-encoded as one segment
    pub fn node_url(&self, id: &str) -> Url {
        self.endpoint(&[id])
    }

    fn endpoint(&self, extra: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always editable
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(NODES_PATH).extend(extra);
        }
        url
    }

    /// List every registered node, in the order the control-plane returns them.
    pub async fn list_nodes(&self) -> Result<Vec<Node>, FetchError> {
        let url = self.nodes_url();
        debug!("GET {}", url);

        let body = self.get_bytes(url).await?;
        let nodes = parse_node_list(&body)?;

        debug!("Received {} nodes", nodes.len());
        Ok(nodes)
    }

    /// Fetch one node by id. 404 becomes [`FetchError::NotFound`].
    pub async fn get_node(&self, id: &str) -> Result<Node, FetchError> {
        let url = self.node_url(id);
        debug!("GET {}", url);

        match self.get_bytes(url).await {
            Err(FetchError::Status(404)) => Err(FetchError::NotFound(id.to_string())),
            Err(e) => Err(e),
            Ok(body) => {
                serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
            }
        }
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl NodeSource for ControlPlaneClient {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, FetchError>> + Send {
        ControlPlaneClient::list_nodes(self)
    }
}

/// Decode a node-list body. Anything but a JSON array of node records
/// (an object, a bare string, ...) is a parse failure.
pub fn parse_node_list(body: &[u8]) -> Result<Vec<Node>, FetchError> {
    serde_json::from_slice::<Vec<Node>>(body).map_err(|e| FetchError::Parse(e.to_string()))
}
