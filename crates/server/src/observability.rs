use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use store::StoreError;

// Prometheus metrics (default registry)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kvstore_operations_total",
        "Store operations handled, by operation",
        &["op"]
    )
    .expect("register operations_total")
});

pub static NOT_FOUND_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "kvstore_not_found_total",
        "Store operations that failed because the key was absent",
        &["op"]
    )
    .expect("register not_found_total")
});

pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "kvstore_request_duration_seconds",
        "Store handler duration in seconds",
        &["op"],
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
    )
    .expect("register request_duration")
});

/// Count one `op` call and, if it missed, the not-found counter.
pub fn record<T>(op: &str, outcome: &Result<T, StoreError>) {
    OPERATIONS_TOTAL.with_label_values(&[op]).inc();
    if matches!(outcome, Err(e) if e.is_not_found()) {
        NOT_FOUND_TOTAL.with_label_values(&[op]).inc();
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
