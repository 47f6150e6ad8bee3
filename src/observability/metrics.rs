//! Metrics collection.
//!
//! # Metrics
//! - `zyb_requests_total` (counter): completed `send` calls by api, outcome
//! - `zyb_request_duration_seconds` (histogram): wall time of `send`, retries included
//! - `zyb_attempts_total` (counter): transport attempts by api
//! - `zyb_retries_total` (counter): scheduled retries by api, reason
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application picks the exporter
//! - Without a recorder installed every call is a no-op

use std::time::Instant;

/// Record a finished `send`.
pub fn record_request(api: &str, outcome: &'static str, start: Instant) {
    metrics::counter!("zyb_requests_total", "api" => api.to_string(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("zyb_request_duration_seconds", "api" => api.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one transport attempt.
pub fn record_attempt(api: &str) {
    metrics::counter!("zyb_attempts_total", "api" => api.to_string()).increment(1);
}

/// Record a scheduled retry.
pub fn record_retry(api: &str, reason: &'static str) {
    metrics::counter!("zyb_retries_total", "api" => api.to_string(), "reason" => reason)
        .increment(1);
}
