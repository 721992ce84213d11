//! Meridian Routing — the deterministic routing engine.
//!
//! This crate provides:
//! - [`RoutingEngine`] — orchestrates one routing decision per call and owns the route cache.
//! - [`RouteComputer`] — digest-seeded deterministic path derivation over the topology.
//! - [`TopologyIndex`] — adjacency of known nodes with path validation and BFS distances.
//! - [`LatencyModel`] — priority-dependent transit latency estimation.
//! - [`RoutingTable`] — concurrent fingerprint-keyed route cache with TTL expiry.
//! - [`SharedSigmaMonitor`] — a stability monitor backed by a shared cell.

pub mod computer;
pub mod engine;
pub mod error;
pub mod latency;
pub mod monitor;
pub mod route;
pub mod table;
pub mod topology;

// Re-exports for convenience.
pub use computer::{DigestMixer, IdentityMixer, KeyedMixer, RouteComputer};
pub use engine::RoutingEngine;
pub use error::RoutingError;
pub use latency::LatencyModel;
pub use monitor::SharedSigmaMonitor;
pub use route::{Fingerprint, Route};
pub use table::RoutingTable;
pub use topology::TopologyIndex;
