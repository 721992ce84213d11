//! The routing engine: one routing decision per call.
//!
//! Gate order is fixed: attestation, stability, derivation, topology
//! validation, latency annotation, cache insert. Every gate
//! short-circuits with no cache mutation. Boundary collaborators are
//! called under a deadline and never inside a table lock.

use chrono::Utc;
use std::sync::Arc;
use tokio::time::timeout;

use meridian_core::config::EngineConfig;
use meridian_core::time::TimeBucket;
use meridian_core::traits::{AttestationVerifier, StabilityMonitor};
use meridian_core::types::Packet;

use crate::computer::{DigestMixer, RouteComputer};
use crate::error::RoutingError;
use crate::latency::LatencyModel;
use crate::route::Route;
use crate::table::RoutingTable;
use crate::topology::TopologyIndex;

/// Orchestrates routing decisions and owns the route cache.
///
/// Stateless with respect to a single call; the routing table is the only
/// shared mutable state and is safe for concurrent callers.
pub struct RoutingEngine {
    verifier: Arc<dyn AttestationVerifier>,
    monitor: Arc<dyn StabilityMonitor>,
    topology: Arc<TopologyIndex>,
    computer: RouteComputer,
    latency: LatencyModel,
    table: RoutingTable,
    config: EngineConfig,
}

impl RoutingEngine {
    /// Engine with the default keyed mixing strategy.
    pub fn new(
        verifier: Arc<dyn AttestationVerifier>,
        monitor: Arc<dyn StabilityMonitor>,
        topology: Arc<TopologyIndex>,
        config: EngineConfig,
    ) -> Self {
        let computer = RouteComputer::new(config.route_ttl);
        let latency = LatencyModel::new(config.base_delay);
        Self {
            verifier,
            monitor,
            topology,
            computer,
            latency,
            table: RoutingTable::new(),
            config,
        }
    }

    /// Engine with a custom mixing strategy.
    pub fn with_mixer(
        verifier: Arc<dyn AttestationVerifier>,
        monitor: Arc<dyn StabilityMonitor>,
        topology: Arc<TopologyIndex>,
        config: EngineConfig,
        mixer: Arc<dyn DigestMixer>,
    ) -> Self {
        let computer = RouteComputer::with_mixer(config.route_ttl, mixer);
        let latency = LatencyModel::new(config.base_delay);
        Self {
            verifier,
            monitor,
            topology,
            computer,
            latency,
            table: RoutingTable::new(),
            config,
        }
    }

    /// The route cache.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// The injected topology.
    pub fn topology(&self) -> &TopologyIndex {
        &self.topology
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Route one packet through the full gate pipeline.
    pub async fn route_packet(&self, packet: &Packet) -> Result<Route, RoutingError> {
        if packet.source.is_blank() {
            return Err(RoutingError::InvalidInput {
                reason: "source identifier is empty".into(),
            });
        }
        if packet.destination.is_blank() {
            return Err(RoutingError::InvalidInput {
                reason: "destination identifier is empty".into(),
            });
        }
        if packet.source == packet.destination {
            return Err(RoutingError::InvalidInput {
                reason: "source and destination are the same node".into(),
            });
        }

        self.check_attestation(packet).await?;
        self.check_stability().await?;

        let bucket = TimeBucket::current(self.config.time_bucket);
        let candidate = self.computer.derive(
            &self.topology,
            &packet.source,
            &packet.destination,
            &packet.nonce,
            bucket,
        )?;

        if !self.topology.validate(&candidate.path) {
            return Err(RoutingError::TopologyViolation {
                reason: format!(
                    "derived path {:?} contains an unknown edge",
                    candidate.path
                ),
            });
        }

        let route = self.latency.annotate(candidate, packet.priority);

        let now = Utc::now();
        if self.table.insert_if_absent(route.clone(), now) {
            tracing::debug!(
                fingerprint = %route.fingerprint,
                hops = route.hop_count(),
                stability = route.stability,
                "route cached"
            );
        } else {
            tracing::trace!(
                fingerprint = %route.fingerprint,
                "live cache entry kept; returning fresh derivation"
            );
        }

        tracing::info!(
            source = %packet.source,
            destination = %packet.destination,
            priority = %packet.priority,
            fingerprint = %route.fingerprint,
            latency_secs = route.latency.as_secs(),
            "packet routed"
        );
        Ok(route)
    }

    async fn check_attestation(&self, packet: &Packet) -> Result<(), RoutingError> {
        let authorized = timeout(
            self.config.dependency_timeout,
            self.verifier
                .verify(&packet.source, &packet.destination, &packet.proof),
        )
        .await
        .map_err(|_| RoutingError::DependencyTimeout {
            dependency: "attestation verifier",
            timeout: self.config.dependency_timeout,
        })?
        .map_err(|e| RoutingError::Attestation {
            reason: format!("verifier unavailable: {}", e),
        })?;

        if !authorized {
            return Err(RoutingError::Attestation {
                reason: format!(
                    "proof rejected for {} -> {}",
                    packet.source, packet.destination
                ),
            });
        }
        Ok(())
    }

    async fn check_stability(&self) -> Result<(), RoutingError> {
        let sigma = timeout(self.config.dependency_timeout, self.monitor.current_sigma())
            .await
            .map_err(|_| RoutingError::DependencyTimeout {
                dependency: "stability monitor",
                timeout: self.config.dependency_timeout,
            })?
            .map_err(|e| RoutingError::Instability {
                reason: format!("stability monitor unavailable: {}", e),
            })?;

        if sigma > self.config.sigma_threshold {
            return Err(RoutingError::Instability {
                reason: format!(
                    "sigma {:.6e} above threshold {:.6e}",
                    sigma, self.config.sigma_threshold
                ),
            });
        }
        Ok(())
    }
}
