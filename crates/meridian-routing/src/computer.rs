//! Deterministic route derivation.
//!
//! Derivation digests the canonical (source, destination, nonce, time
//! bucket) preimage with BLAKE3, applies a keyed second-pass mixing
//! transformation, and maps the mixed digest onto a concrete path by a
//! digest-seeded walk over the topology. Identical inputs within the same
//! bucket yield identical fingerprints and paths.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use meridian_core::time::TimeBucket;
use meridian_core::types::NodeId;
use meridian_crypto::hashing::{digest, keyed_mix, Digest, DigestStream};

use crate::error::RoutingError;
use crate::route::{Fingerprint, Route};
use crate::topology::TopologyIndex;

/// Domain-separation context for the route mixing pass.
const ROUTE_MIX_CONTEXT: &str = "meridian 2025-06-01 route derivation mix v1";

/// Strategy for the second mixing pass applied to the primary digest.
///
/// The contract: deterministic (same digest → same output) and not
/// trivially invertible or predictable from the digest alone.
pub trait DigestMixer: Send + Sync {
    fn mix(&self, input: &Digest) -> Digest;
}

/// Default mixer: a BLAKE3 keyed pass under a fixed domain-separation
/// context.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedMixer;

impl DigestMixer for KeyedMixer {
    fn mix(&self, input: &Digest) -> Digest {
        keyed_mix(ROUTE_MIX_CONTEXT, input)
    }
}

/// Pass-through mixer. Lets callers observe the primary digest directly
/// when unpredictability is not required.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMixer;

impl DigestMixer for IdentityMixer {
    fn mix(&self, input: &Digest) -> Digest {
        *input
    }
}

/// Derives candidate routes from packet identity and the current time
/// bucket.
pub struct RouteComputer {
    mixer: Arc<dyn DigestMixer>,
    route_ttl: Duration,
}

impl RouteComputer {
    /// Computer with the default keyed mixer.
    pub fn new(route_ttl: Duration) -> Self {
        Self {
            mixer: Arc::new(KeyedMixer),
            route_ttl,
        }
    }

    /// Computer with a custom mixing strategy.
    pub fn with_mixer(route_ttl: Duration, mixer: Arc<dyn DigestMixer>) -> Self {
        Self { mixer, route_ttl }
    }

    /// Derive a candidate route. The returned route carries no latency
    /// estimate yet; annotation happens after topology validation.
    ///
    /// Fails with a topology violation when the destination cannot be
    /// reached from the source.
    pub fn derive(
        &self,
        topology: &TopologyIndex,
        source: &NodeId,
        destination: &NodeId,
        nonce: &str,
        bucket: TimeBucket,
    ) -> Result<Route, RoutingError> {
        let preimage = derivation_preimage(source, destination, nonce, bucket);
        let mixed = self.mixer.mix(&digest(&preimage));

        let path = self.walk(topology, source, destination, &mixed)?;
        let stability = path_stability(topology, &path);

        Ok(Route {
            path,
            fingerprint: Fingerprint::from_digest(mixed),
            stability,
            expires_at: Utc::now()
                + chrono::Duration::from_std(self.route_ttl).unwrap_or(chrono::Duration::zero()),
            latency: Duration::ZERO,
        })
    }

    /// Digest-seeded walk from source to destination.
    ///
    /// Each hop chooses among the lexically ordered neighbors whose BFS
    /// distance to the destination is strictly smaller than the current
    /// node's, indexed by the next stream byte. Strictly decreasing
    /// distance guarantees termination and topology validity.
    fn walk(
        &self,
        topology: &TopologyIndex,
        source: &NodeId,
        destination: &NodeId,
        seed: &Digest,
    ) -> Result<Vec<NodeId>, RoutingError> {
        let distances = topology.distances_to(destination);
        if !distances.contains_key(source) {
            return Err(RoutingError::TopologyViolation {
                reason: format!("no path from {} to {}", source, destination),
            });
        }

        let mut stream = DigestStream::new(seed);
        let mut path = vec![source.clone()];
        let mut current = source.clone();

        while current != *destination {
            let current_distance = distances[&current];
            let candidates: Vec<&NodeId> = topology
                .neighbors(&current)
                .iter()
                .filter(|n| distances.get(*n).map_or(false, |d| *d < current_distance))
                .collect();
            // Nonempty by the BFS invariant: any node at finite distance
            // d > 0 has a neighbor at distance d - 1.
            if candidates.is_empty() {
                return Err(RoutingError::TopologyViolation {
                    reason: format!("walk stranded at {}", current),
                });
            }
            let pick = candidates[stream.next_byte() as usize % candidates.len()].clone();
            path.push(pick.clone());
            current = pick;
        }

        Ok(path)
    }
}

/// Canonical derivation preimage. Fields are length-framed so adjacent
/// fields cannot shift bytes between one another.
fn derivation_preimage(
    source: &NodeId,
    destination: &NodeId,
    nonce: &str,
    bucket: TimeBucket,
) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(
        20 + source.as_bytes().len() + destination.as_bytes().len() + nonce.len(),
    );
    for field in [source.as_bytes(), destination.as_bytes(), nonce.as_bytes()] {
        preimage.extend_from_slice(&(field.len() as u32).to_be_bytes());
        preimage.extend_from_slice(field);
    }
    preimage.extend_from_slice(&bucket.to_be_bytes());
    preimage
}

/// Stability of a path: the product of per-edge reliability weights.
/// Longer paths score lower.
fn path_stability(topology: &TopologyIndex, path: &[NodeId]) -> f64 {
    path.windows(2)
        .map(|pair| topology.link_reliability(&pair[0], &pair[1]))
        .product::<f64>()
        .clamp(0.0, 1.0)
}
