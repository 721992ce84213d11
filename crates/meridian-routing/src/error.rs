use std::time::Duration;

/// Errors surfaced by the routing pipeline.
///
/// Each variant names the gate that refused the packet and carries enough
/// context for the caller to decide whether a retry can help.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("attestation gate: {reason}")]
    Attestation { reason: String },

    #[error("instability gate: {reason}")]
    Instability { reason: String },

    #[error("topology violation: {reason}")]
    TopologyViolation { reason: String },

    #[error("dependency timeout: {dependency} exceeded {timeout:?}")]
    DependencyTimeout {
        dependency: &'static str,
        timeout: Duration,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl RoutingError {
    /// Whether retrying the same call may succeed. Instability is
    /// transient (σ can drop) and a dependency may recover from a
    /// timeout; the other gates fail deterministically for identical
    /// inputs within the derivation window.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RoutingError::Instability { .. } | RoutingError::DependencyTimeout { .. }
        )
    }
}
