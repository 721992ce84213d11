//! Shared test doubles for the cross-crate routing scenarios.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use meridian_core::error::BoundaryError;
use meridian_core::traits::{AttestationVerifier, StabilityMonitor};
use meridian_core::types::NodeId;
use meridian_crypto::Digest;
use meridian_routing::{DigestMixer, KeyedMixer, TopologyIndex};

/// What a scripted boundary call should do.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Return(T),
    Fail(String),
}

/// Attestation verifier double that counts calls and returns a scripted
/// outcome.
pub struct CountingVerifier {
    outcome: Scripted<bool>,
    calls: AtomicUsize,
}

impl CountingVerifier {
    pub fn authorizing() -> Self {
        Self::with_outcome(Scripted::Return(true))
    }

    pub fn rejecting() -> Self {
        Self::with_outcome(Scripted::Return(false))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Scripted::Fail(message.to_string()))
    }

    pub fn with_outcome(outcome: Scripted<bool>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttestationVerifier for CountingVerifier {
    async fn verify(
        &self,
        _source: &NodeId,
        _destination: &NodeId,
        _proof: &[u8],
    ) -> Result<bool, BoundaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Scripted::Return(authorized) => Ok(*authorized),
            Scripted::Fail(message) => Err(BoundaryError::new(message.clone())),
        }
    }
}

/// Stability monitor double that counts calls and returns a scripted σ.
pub struct CountingMonitor {
    outcome: Scripted<f64>,
    calls: AtomicUsize,
}

impl CountingMonitor {
    pub fn reporting(sigma: f64) -> Self {
        Self::with_outcome(Scripted::Return(sigma))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Scripted::Fail(message.to_string()))
    }

    pub fn with_outcome(outcome: Scripted<f64>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StabilityMonitor for CountingMonitor {
    async fn current_sigma(&self) -> Result<f64, BoundaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Scripted::Return(sigma) => Ok(*sigma),
            Scripted::Fail(message) => Err(BoundaryError::new(message.clone())),
        }
    }
}

/// Digest mixer double that counts derivations while mixing like the
/// default strategy would.
#[derive(Default)]
pub struct CountingMixer {
    calls: AtomicUsize,
}

impl CountingMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DigestMixer for CountingMixer {
    fn mix(&self, input: &Digest) -> Digest {
        self.calls.fetch_add(1, Ordering::SeqCst);
        KeyedMixer.mix(input)
    }
}

/// The interplanetary test topology used across scenarios:
///
/// ```text
///        luna ------ mars
///       /           /
/// earth --- relay -+
///       \         /
///        venus --+
/// ```
///
/// All links are symmetric.
pub fn interplanetary_topology() -> TopologyIndex {
    let mut topology = TopologyIndex::new();
    for (a, b) in [
        ("earth", "luna"),
        ("luna", "mars"),
        ("earth", "relay"),
        ("relay", "mars"),
        ("earth", "venus"),
        ("venus", "mars"),
    ] {
        topology.insert_link(a, b);
        topology.insert_link(b, a);
    }
    topology
}
