//! Metrics and observability utilities
//!
//! Prometheus-style metrics through the `metrics` facade. Nothing is recorded
//! until a recorder (the gateway's Prometheus exporter) is installed.

use crate::advisory::RiskLevel;
use crate::knowledge::CancerType;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all OncoAssist metrics
pub const METRICS_PREFIX: &str = "oncoassist";

/// Histogram buckets for request latency (in seconds).
/// Composition is in-memory, so most requests land in the first buckets.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.0005, // 0.5ms
    0.001,  // 1ms
    0.0025, // 2.5ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_responses_composed_total", METRICS_PREFIX),
        Unit::Count,
        "Advisory responses composed, by recognized cancer type"
    );

    describe_counter!(
        format!("{}_risk_assessments_total", METRICS_PREFIX),
        Unit::Count,
        "Exhaustive risk assessments, by resulting level"
    );

    describe_counter!(
        format!("{}_risk_alerts_total", METRICS_PREFIX),
        Unit::Count,
        "Risk alerts raised by exhaustive assessments"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record a composed advisory response
pub fn record_compose(cancer_type: Option<CancerType>, risk_alert: bool) {
    let cancer_type = cancer_type.map(|t| t.as_str()).unwrap_or("none");

    counter!(
        format!("{}_responses_composed_total", METRICS_PREFIX),
        "cancer_type" => cancer_type,
        "risk_alert" => if risk_alert { "true" } else { "false" }
    )
    .increment(1);
}

/// Helper to record an exhaustive risk assessment
pub fn record_risk_assessment(level: RiskLevel, alert_count: usize) {
    counter!(
        format!("{}_risk_assessments_total", METRICS_PREFIX),
        "level" => level.as_str()
    )
    .increment(1);

    counter!(format!("{}_risk_alerts_total", METRICS_PREFIX)).increment(alert_count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_recording_without_recorder() {
        let metrics = RequestMetrics::start("POST", "/api/chat");
        metrics.finish(200);
        record_compose(Some(CancerType::LungCancer), true);
        record_compose(None, false);
        record_risk_assessment(RiskLevel::High, 2);
    }
}
