use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::time::duration_secs;

/// Tunables for the routing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum tolerated instability measure; routing is refused above it.
    pub sigma_threshold: f64,
    /// Validity window of a cached route.
    #[serde(with = "duration_secs")]
    pub route_ttl: Duration,
    /// Width of the derivation time bucket.
    #[serde(with = "duration_secs")]
    pub time_bucket: Duration,
    /// Deadline for each boundary-collaborator call.
    #[serde(with = "duration_secs")]
    pub dependency_timeout: Duration,
    /// Base transit delay before priority scaling.
    #[serde(with = "duration_secs")]
    pub base_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: 5e-5,
            route_ttl: Duration::from_secs(300),
            time_bucket: Duration::from_secs(60),
            dependency_timeout: Duration::from_secs(3),
            base_delay: Duration::from_secs(3500),
        }
    }
}
