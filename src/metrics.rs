//! Prometheus metrics for webhook traffic.
//!
//! This module provides metrics for:
//! - Calls per lifecycle action
//! - Validation refusals
//! - Rejected request bodies
//! - Handler latency

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::provider::LifecycleEvent;

// === Metric Name Constants ===

/// Webhook calls counter metric name.
pub const METRIC_WEBHOOK_REQUESTS: &str = "webhook_requests_total";
/// Validation refusals counter metric name.
pub const METRIC_VALIDATION_FAILURES: &str = "webhook_validation_failures_total";
/// Rejected bodies counter metric name.
pub const METRIC_MALFORMED_BODIES: &str = "webhook_malformed_bodies_total";
/// Handler latency metric name.
pub const METRIC_HANDLER_LATENCY: &str = "webhook_handler_latency_ms";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_WEBHOOK_REQUESTS,
        "Total number of lifecycle callbacks received"
    );
    describe_counter!(
        METRIC_VALIDATION_FAILURES,
        "Total number of lifecycle callbacks refused by validation"
    );
    describe_counter!(
        METRIC_MALFORMED_BODIES,
        "Total number of requests rejected for an unusable body"
    );
    describe_histogram!(
        METRIC_HANDLER_LATENCY,
        "Lifecycle handler latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment webhook call counter.
pub fn inc_webhook_requests(event: LifecycleEvent) {
    counter!(METRIC_WEBHOOK_REQUESTS, "action" => event.action()).increment(1);
}

/// Increment validation refusal counter.
pub fn inc_validation_failures(event: LifecycleEvent) {
    counter!(METRIC_VALIDATION_FAILURES, "action" => event.action()).increment(1);
}

/// Increment rejected body counter.
pub fn inc_malformed_bodies() {
    counter!(METRIC_MALFORMED_BODIES).increment(1);
}

/// RAII guard for timing a handler.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    event: LifecycleEvent,
}

impl LatencyTimer {
    /// Start timing a handler for `event`.
    pub fn new(event: LifecycleEvent) -> Self {
        Self {
            start: Instant::now(),
            event,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_HANDLER_LATENCY, "action" => self.event.action())
            .record(self.elapsed_ms());
    }
}
