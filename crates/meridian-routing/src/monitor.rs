use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use meridian_core::error::BoundaryError;
use meridian_core::traits::StabilityMonitor;

/// Stability monitor backed by a shared cell.
///
/// An external feed (or the node's config at startup) sets σ; every
/// engine read sees the latest value. Clones share the same cell.
#[derive(Clone)]
pub struct SharedSigmaMonitor {
    sigma: Arc<RwLock<f64>>,
}

impl SharedSigmaMonitor {
    pub fn new(initial_sigma: f64) -> Self {
        Self {
            sigma: Arc::new(RwLock::new(initial_sigma)),
        }
    }

    /// Update the current instability measure.
    pub fn set(&self, sigma: f64) {
        *self.sigma.write().unwrap() = sigma;
    }

    /// Read the current value without going through the trait.
    pub fn get(&self) -> f64 {
        *self.sigma.read().unwrap()
    }
}

#[async_trait]
impl StabilityMonitor for SharedSigmaMonitor {
    async fn current_sigma(&self) -> Result<f64, BoundaryError> {
        Ok(self.get())
    }
}
