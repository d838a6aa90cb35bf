pub mod middleware;
pub mod registry;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

/// Handler for the /metrics endpoint
/// Returns metrics in Prometheus exposition format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

// Re-export commonly used metrics for convenience
pub use registry::{
    ERROR_DOCUMENTS_TOTAL, ERROR_OVERRIDES_APPLIED_TOTAL, ERROR_OVERRIDES_CONFIGURED,
    HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS, MAINTENANCE_MODE_ACTIVE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_exposes_error_counters() {
        registry::init_metrics();
        ERROR_DOCUMENTS_TOTAL
            .with_label_values(&["not_found", "404"])
            .inc();

        let response = metrics_handler().await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("jsonapi_error_documents_total"));
    }
}
