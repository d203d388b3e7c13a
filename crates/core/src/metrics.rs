//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Jobs (submissions, outcomes, in-flight count, conversion duration)
//! - Retention (sweeps, removals per storage area)
//! - Bundles (archive builds on download)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Job Metrics
// =============================================================================

/// Uploads accepted as new jobs.
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("partitura_jobs_submitted_total", "Total jobs submitted").unwrap()
});

/// Jobs reaching a terminal state, by result.
pub static JOBS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("partitura_jobs_finished_total", "Total jobs finished"),
        &["result"], // "completed", "completed_with_errors", "error", "panicked"
    )
    .unwrap()
});

/// Background job tasks currently running.
pub static JOBS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("partitura_jobs_active", "Background job tasks currently running").unwrap()
});

/// Duration of the external converter run.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "partitura_conversion_duration_seconds",
            "Duration of external converter runs",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &["result"], // "success", "exit_error"
    )
    .unwrap()
});

// =============================================================================
// Retention Metrics
// =============================================================================

/// Sweeps run.
pub static SWEEPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("partitura_sweeps_total", "Total retention sweeps run").unwrap()
});

/// Entries removed by the sweeper.
pub static SWEEP_REMOVALS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "partitura_sweep_removals_total",
            "Total entries removed by retention sweeps",
        ),
        &["area"], // "uploads", "job_dirs"
    )
    .unwrap()
});

/// Failed deletions or directory reads during sweeps.
pub static SWEEP_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "partitura_sweep_failures_total",
        "Total failures encountered during retention sweeps",
    )
    .unwrap()
});

// =============================================================================
// Bundle Metrics
// =============================================================================

/// Bundles built on download, by result.
pub static BUNDLES_BUILT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("partitura_bundles_built_total", "Total download bundles built"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Jobs
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_FINISHED.clone()),
        Box::new(JOBS_ACTIVE.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        // Retention
        Box::new(SWEEPS_TOTAL.clone()),
        Box::new(SWEEP_REMOVALS.clone()),
        Box::new(SWEEP_FAILURES.clone()),
        // Bundles
        Box::new(BUNDLES_BUILT.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_once() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        JOBS_FINISHED.with_label_values(&["completed"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "partitura_jobs_finished_total"));
    }
}
