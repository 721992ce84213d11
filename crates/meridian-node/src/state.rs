//! Shared node state for HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use meridian_routing::{RoutingEngine, SharedSigmaMonitor};

/// State shared between the HTTP handlers and the node lifecycle.
pub struct NodeState {
    /// Node display name.
    pub node_name: String,
    /// When the node started.
    pub start_time: Instant,
    /// The routing engine.
    pub engine: Arc<RoutingEngine>,
    /// Handle to the stability feed, kept so operators can update σ.
    pub monitor: SharedSigmaMonitor,
}

impl NodeState {
    pub fn new(node_name: String, engine: Arc<RoutingEngine>, monitor: SharedSigmaMonitor) -> Self {
        Self {
            node_name,
            start_time: Instant::now(),
            engine,
            monitor,
        }
    }
}
