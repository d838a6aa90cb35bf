//! JSON API media type handling

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Whether the `Accept` header lists the JSON API media type
pub fn accepts_json_api(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|range| {
            let media_type = range.split(';').next().unwrap_or("").trim();
            media_type.eq_ignore_ascii_case(JSON_API_MEDIA_TYPE)
        })
}

/// Whether the `Content-Type` header is exactly the JSON API media type.
/// Media type parameters are not allowed.
pub fn is_json_api_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().eq_ignore_ascii_case(JSON_API_MEDIA_TYPE))
        .unwrap_or(false)
}

/// JSON response with the JSON API content type
#[derive(Debug, Clone)]
pub struct JsonApi<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.1) {
            Ok(body) => (
                self.0,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_API_MEDIA_TYPE),
                )],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize JSON API body: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
