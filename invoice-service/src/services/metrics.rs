//! Prometheus metrics for invoice-service.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// HTTP request counter by method, route and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register http_requests_total")
});

/// HTTP request duration histogram by method and route.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register http_request_duration")
});

/// Action outcomes by operation.
pub static ACTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_actions_total",
        "Total number of invoice actions by outcome",
        &["operation", "outcome"] // success, invalid, store_error
    )
    .expect("Failed to register actions_total")
});

/// Store failures by operation and classification.
pub static STORE_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_store_errors_total",
        "Total number of store errors by kind",
        &["operation", "kind"]
    )
    .expect("Failed to register store_errors_total")
});

/// Updates and deletes that matched no row.
pub static MISSING_ROWS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_missing_rows_total",
        "Total number of updates/deletes that affected zero rows",
        &["operation"]
    )
    .expect("Failed to register missing_rows_total")
});

/// View cache lookups by result.
pub static CACHE_LOOKUPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_view_cache_lookups_total",
        "Total number of view cache lookups",
        &["result"] // hit, miss
    )
    .expect("Failed to register view_cache_lookups_total")
});

/// View cache invalidations by path.
pub static CACHE_INVALIDATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_view_cache_invalidations_total",
        "Total number of view cache invalidations",
        &["path"]
    )
    .expect("Failed to register view_cache_invalidations_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&ACTIONS_TOTAL);
    Lazy::force(&STORE_ERRORS_TOTAL);
    Lazy::force(&MISSING_ROWS_TOTAL);
    Lazy::force(&CACHE_LOOKUPS_TOTAL);
    Lazy::force(&CACHE_INVALIDATIONS_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

/// Record request count and latency, labelled by the matched route.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let timer_start = std::time::Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path])
        .observe(timer_start.elapsed().as_secs_f64());

    response
}
