use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Error Document Metrics
    pub static ref ERROR_DOCUMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jsonapi_error_documents_total",
        "Total JSON API error documents rendered",
        &["kind", "status"]
    )
    .unwrap();

    pub static ref ERROR_OVERRIDES_APPLIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jsonapi_error_overrides_applied_total",
        "Total error documents rendered from a configured override",
        &["kind"]
    )
    .unwrap();

    // Settings Metrics
    pub static ref ERROR_OVERRIDES_CONFIGURED: IntGauge = register_int_gauge!(
        "jsonapi_error_overrides_configured",
        "Number of entries in the current override table"
    )
    .unwrap();

    pub static ref MAINTENANCE_MODE_ACTIVE: IntGauge = register_int_gauge!(
        "maintenance_mode_active",
        "1 while the service is in maintenance mode"
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&ERROR_DOCUMENTS_TOTAL);
    lazy_static::initialize(&ERROR_OVERRIDES_APPLIED_TOTAL);
    lazy_static::initialize(&ERROR_OVERRIDES_CONFIGURED);
    lazy_static::initialize(&MAINTENANCE_MODE_ACTIVE);
}
