use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::media::JsonApi;

/// JSON API error document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDocument {
    /// Always holds exactly one error object
    pub errors: Vec<ErrorObject>,
}

/// JSON API error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    /// HTTP status code, as a string
    pub status: String,
    /// Short summary of the problem
    pub title: String,
    /// Explanation specific to this occurrence (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Application-specific error code (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ErrorObject {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            title: title.into(),
            detail: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }
}

/// Translated error ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub document: ErrorDocument,
    /// Seconds for the `Retry-After` header
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: ErrorObject) -> Self {
        Self {
            status,
            document: ErrorDocument {
                errors: vec![error],
            },
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after = seconds;
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = JsonApi(status, self.document).into_response();
        if let Some(seconds) = self.retry_after {
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, seconds.into());
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::JSON_API_MEDIA_TYPE;
    use axum::http::header;
    use serde_json::json;

    #[test]
    fn test_error_object_omits_empty_members() {
        let error = ErrorObject::new(404, "Not Found");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value, json!({"status": "404", "title": "Not Found"}));
    }

    #[test]
    fn test_error_object_member_order() {
        let error = ErrorObject::new(400, "Invalid JSON")
            .with_detail("Syntax error")
            .with_code(4);
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"status":"400","title":"Invalid JSON","detail":"Syntax error","code":4}"#
        );
    }

    // ========== HTTP RESPONSE TESTS ==========

    #[test]
    fn test_into_response_status_and_content_type() {
        let response = ErrorResponse::new(419, ErrorObject::new(419, "Invalid Token")).into_response();
        assert_eq!(response.status().as_u16(), 419);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JSON_API_MEDIA_TYPE
        );
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_into_response_retry_after() {
        let response = ErrorResponse::new(503, ErrorObject::new(503, "Service Unavailable"))
            .with_retry_after(Some(60))
            .into_response();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    }

    #[test]
    fn test_into_response_body() {
        let response = ErrorResponse::new(404, ErrorObject::new(404, "Not Found")).into_response();
        let body = tokio_test::block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"errors": [{"status": "404", "title": "Not Found"}]})
        );
    }
}
