//! Shared helpers for engine integration tests.

use std::sync::Arc;

use fintrack_core::metrics::MetricsBundle;
use fintrack_engine::{EngineConfig, FixedMetrics, GamificationEngine};
use sqlx::PgPool;

/// Build an engine over a [`FixedMetrics`] provider, returning the
/// provider handle so tests can mutate the served bundle.
pub fn engine_with(
    pool: PgPool,
    bundle: MetricsBundle,
) -> (GamificationEngine<Arc<FixedMetrics>>, Arc<FixedMetrics>) {
    engine_with_config(pool, bundle, EngineConfig::default())
}

#[allow(dead_code)]
pub fn engine_with_config(
    pool: PgPool,
    bundle: MetricsBundle,
    config: EngineConfig,
) -> (GamificationEngine<Arc<FixedMetrics>>, Arc<FixedMetrics>) {
    let provider = Arc::new(FixedMetrics::new(bundle));
    let engine = GamificationEngine::with_config(pool, provider.clone(), config);
    (engine, provider)
}
