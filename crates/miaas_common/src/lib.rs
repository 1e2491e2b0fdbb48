//! MIaaS common types shared by the dashboard and the one-shot CLI
//!
//! - node: Node records as served by the control-plane
//! - format: display rules for node fields (last seen, ids, capabilities)
//! - api: HTTP client for the read-only node endpoints
//! - config: base URL and transport settings
//! - error: fetch failure taxonomy

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod node;

pub use api::{ControlPlaneClient, NodeSource};
pub use config::DashboardConfig;
pub use error::{ConfigError, FetchError};
pub use node::{CapabilityValue, Capabilities, Liveness, Node};
