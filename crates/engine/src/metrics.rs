//! Metrics provider seam (PRD-20).
//!
//! Aggregate financial metrics are owned by the data-access layer; the
//! engine consumes them through this trait. [`FixedMetrics`] is an
//! in-memory implementation for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fintrack_core::metrics::MetricsBundle;
use fintrack_core::types::DbId;

/// Failure reported by a metrics provider.
///
/// Always recoverable: the engine aborts the trigger without mutating
/// state and expects the caller to retry later.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MetricsError(pub String);

/// Read-only source of per-user aggregate metrics.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetch the metrics bundle for a user.
    async fn metrics_for(&self, user_id: DbId) -> Result<MetricsBundle, MetricsError>;
}

#[async_trait]
impl<M: MetricsProvider> MetricsProvider for Arc<M> {
    async fn metrics_for(&self, user_id: DbId) -> Result<MetricsBundle, MetricsError> {
        (**self).metrics_for(user_id).await
    }
}

/// Provider that serves one mutable in-memory bundle to every user.
///
/// Test and development double: tests mutate the bundle between trigger
/// calls to simulate metric changes, and can switch the provider into a
/// failing mode to exercise the abort path.
pub struct FixedMetrics {
    bundle: Mutex<MetricsBundle>,
    failing: AtomicBool,
}

impl FixedMetrics {
    pub fn new(bundle: MetricsBundle) -> Self {
        Self {
            bundle: Mutex::new(bundle),
            failing: AtomicBool::new(false),
        }
    }

    /// Replace the served bundle.
    pub fn set(&self, bundle: MetricsBundle) {
        if let Ok(mut guard) = self.bundle.lock() {
            *guard = bundle;
        }
    }

    /// Mutate the served bundle in place.
    pub fn update(&self, mutate: impl FnOnce(&mut MetricsBundle)) {
        if let Ok(mut guard) = self.bundle.lock() {
            mutate(&mut guard);
        }
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(MetricsBundle::default())
    }
}

#[async_trait]
impl MetricsProvider for FixedMetrics {
    async fn metrics_for(&self, _user_id: DbId) -> Result<MetricsBundle, MetricsError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetricsError("metrics backend unavailable".to_string()));
        }
        self.bundle
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| MetricsError("metrics bundle mutex poisoned".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
