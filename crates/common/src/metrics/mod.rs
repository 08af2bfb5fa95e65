//! Metrics helpers
//!
//! Prometheus-style counters and histograms with standardized naming.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all PaperScope metrics
pub const METRICS_PREFIX: &str = "paperscope";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_counter!(
        format!("{}_request_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of error responses, by kind"
    );

    describe_histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Database query latency in seconds"
    );

    describe_counter!(
        format!("{}_papers_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total papers created (single and batch paths)"
    );

    describe_counter!(
        format!("{}_reviews_submitted_total", METRICS_PREFIX),
        Unit::Count,
        "Total reviews submitted"
    );

    describe_counter!(
        format!("{}_recommendations_total", METRICS_PREFIX),
        Unit::Count,
        "Total recommendation requests, by outcome"
    );

    describe_histogram!(
        format!("{}_recommendation_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Outbound recommendation call latency in seconds"
    );
}

/// Record a database query
pub fn record_query(operation: &'static str, duration_secs: f64) {
    histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        "operation" => operation
    )
    .record(duration_secs);
}

/// Record created papers
pub fn record_papers_created(count: u64, path: &'static str) {
    counter!(
        format!("{}_papers_created_total", METRICS_PREFIX),
        "path" => path
    )
    .increment(count);
}

/// Record a submitted review
pub fn record_review_submitted() {
    counter!(format!("{}_reviews_submitted_total", METRICS_PREFIX)).increment(1);
}

/// Record a recommendation request outcome
pub fn record_recommendation(outcome: &'static str, duration_secs: f64) {
    counter!(
        format!("{}_recommendations_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(format!("{}_recommendation_duration_seconds", METRICS_PREFIX))
        .record(duration_secs);
}
