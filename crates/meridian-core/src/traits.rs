use async_trait::async_trait;

use crate::error::BoundaryError;
use crate::types::NodeId;

/// Boundary contract: answers whether a source→destination transfer is
/// authorized by the supplied proof.
///
/// Implementations may call out to a chain, a remote service, or verify a
/// local signature. Any error, like any `Ok(false)`, aborts routing at
/// the attestation gate.
#[async_trait]
pub trait AttestationVerifier: Send + Sync {
    async fn verify(
        &self,
        source: &NodeId,
        destination: &NodeId,
        proof: &[u8],
    ) -> Result<bool, BoundaryError>;
}

/// Boundary contract: reports the current system-wide instability
/// measure (σ). Routing is refused when σ exceeds the configured
/// threshold.
#[async_trait]
pub trait StabilityMonitor: Send + Sync {
    async fn current_sigma(&self) -> Result<f64, BoundaryError>;
}
