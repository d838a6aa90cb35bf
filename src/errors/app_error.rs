use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::kind::ErrorKind;
use super::overrides::ErrorOverrides;
use super::translator::translate;

/// Error raised while handling a request.
///
/// Each variant maps to exactly one [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Expecting request to contain a JSON API document.")]
    DocumentRequired,

    #[error("Invalid JSON: {0}")]
    InvalidJson(JsonFault),

    #[error("{message}")]
    MaintenanceMode {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("{0}")]
    TokenMismatch(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal failure. The message is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reason a request body failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JsonFault {
    #[error("Maximum stack depth exceeded")]
    Depth,

    #[error("Syntax error")]
    Syntax,

    #[error("Malformed UTF-8 characters, possibly incorrectly encoded")]
    Utf8,
}

impl JsonFault {
    /// Numeric JSON decode error code
    pub fn code(&self) -> i64 {
        match self {
            Self::Depth => 1,
            Self::Syntax => 4,
            Self::Utf8 => 5,
        }
    }
}

impl From<&serde_json::Error> for JsonFault {
    fn from(err: &serde_json::Error) -> Self {
        if err.to_string().starts_with("recursion limit exceeded") {
            Self::Depth
        } else {
            Self::Syntax
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::DocumentRequired => ErrorKind::DocumentRequired,
            Self::InvalidJson(_) => ErrorKind::InvalidJson,
            Self::MaintenanceMode { .. } => ErrorKind::MaintenanceMode,
            Self::TokenMismatch(_) => ErrorKind::TokenMismatch,
            Self::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            Self::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            Self::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            Self::Internal(_) => ErrorKind::Generic,
        }
    }

    /// Detail carried by this occurrence, filling the kind's default
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::InvalidJson(fault) => Some(fault.to_string()),
            Self::MaintenanceMode { message, .. } => Some(message.clone()),
            Self::TokenMismatch(message)
            | Self::UnsupportedMediaType(message)
            | Self::PayloadTooLarge(message) => Some(message.clone()),
            Self::NotFound | Self::DocumentRequired | Self::MethodNotAllowed | Self::Internal(_) => {
                None
            }
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Self::InvalidJson(fault) => Some(fault.code()),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::MaintenanceMode { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn token_mismatch() -> Self {
        Self::TokenMismatch("CSRF token mismatch.".to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }
}

/// Body buffering failures. Only an exceeded length limit is the client's fault.
impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("Request body exceeds the allowed size.".to_string())
        } else {
            Self::Internal(format!("Failed to read request body: {}", rejection.body_text()))
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(e) => {
                if e.body_text().contains("recursion limit exceeded") {
                    Self::InvalidJson(JsonFault::Depth)
                } else {
                    Self::InvalidJson(JsonFault::Syntax)
                }
            }
            JsonRejection::JsonDataError(_) => Self::DocumentRequired,
            JsonRejection::MissingJsonContentType(e) => Self::UnsupportedMediaType(e.body_text()),
            JsonRejection::BytesRejection(e) => Self::from(e),
            other => Self::Internal(other.body_text()),
        }
    }
}

/// Renders with no overrides and keeps the error in the response
/// extensions so the rendering middleware can re-translate it against the
/// request's settings snapshot.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = translate(&self, &ErrorOverrides::new()).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(AppError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AppError::DocumentRequired.kind(), ErrorKind::DocumentRequired);
        assert_eq!(
            AppError::InvalidJson(JsonFault::Syntax).kind(),
            ErrorKind::InvalidJson
        );
        assert_eq!(AppError::token_mismatch().kind(), ErrorKind::TokenMismatch);
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).kind(),
            ErrorKind::Generic
        );
    }

    #[test]
    fn test_json_fault_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{\"data\": ").unwrap_err();
        assert_eq!(JsonFault::from(&err), JsonFault::Syntax);

        let deep = "[".repeat(200) + &"]".repeat(200);
        let err = serde_json::from_str::<serde_json::Value>(&deep).unwrap_err();
        assert_eq!(JsonFault::from(&err), JsonFault::Depth);
        assert_eq!(JsonFault::Depth.code(), 1);
    }

    #[test]
    fn test_method_not_allowed_has_no_detail() {
        assert_eq!(AppError::MethodNotAllowed.kind(), ErrorKind::MethodNotAllowed);
        assert_eq!(AppError::MethodNotAllowed.detail(), None);
    }

    #[test]
    fn test_payload_too_large_keeps_message() {
        let err = AppError::PayloadTooLarge("Too big.".to_string());
        assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(err.detail().as_deref(), Some("Too big."));
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::internal("database password is hunter2");
        assert_eq!(err.detail(), None);
        assert!(err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_into_response_keeps_error_in_extensions() {
        let response = AppError::token_mismatch().into_response();
        assert_eq!(response.status().as_u16(), 419);
        assert_eq!(
            response.extensions().get::<AppError>(),
            Some(&AppError::token_mismatch())
        );
    }
}
