use std::time::Duration;

use meridian_core::types::Priority;

use crate::route::Route;

/// Priority-dependent transit latency estimator.
///
/// Pure: annotation never fails and the same (priority, base delay) pair
/// always yields the same estimate.
#[derive(Debug, Clone)]
pub struct LatencyModel {
    base_delay: Duration,
}

impl LatencyModel {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Multiplier applied to the base delay for a priority class.
    pub fn multiplier(priority: Priority) -> f64 {
        match priority {
            Priority::Emergency => 0.5,
            Priority::Consciousness => 0.8,
            Priority::Data => 1.0,
            Priority::BestEffort => 1.2,
        }
    }

    /// Estimated transit delay for the given priority.
    pub fn estimate(&self, priority: Priority) -> Duration {
        self.base_delay.mul_f64(Self::multiplier(priority))
    }

    /// Route annotated with the estimate for `priority`.
    pub fn annotate(&self, route: Route, priority: Priority) -> Route {
        route.with_latency(self.estimate(priority))
    }
}
