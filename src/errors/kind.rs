use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Category of an error raised while handling a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resource or route not found
    NotFound,

    /// Write request without a JSON API document
    DocumentRequired,

    /// Request body could not be decoded as JSON
    InvalidJson,

    /// Service is down for maintenance
    MaintenanceMode,

    /// Session token missing or not matching
    TokenMismatch,

    /// Write request with a content type other than the JSON API media type
    UnsupportedMediaType,

    /// Route exists but not for this method
    MethodNotAllowed,

    /// Request body over the size limit
    PayloadTooLarge,

    /// Anything else
    Generic,
}

/// Built-in error body for a kind. One per kind, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDefault {
    pub kind: ErrorKind,
    pub status: u16,
    pub title: &'static str,
    pub detail: Option<&'static str>,
    pub code: Option<i64>,
}

const DEFAULTS: [ErrorDefault; 9] = [
    ErrorDefault {
        kind: ErrorKind::NotFound,
        status: 404,
        title: "Not Found",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::DocumentRequired,
        status: 400,
        title: "Document Required",
        detail: Some("Expecting request to contain a JSON API document."),
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::InvalidJson,
        status: 400,
        title: "Invalid JSON",
        detail: Some("Syntax error"),
        code: Some(4),
    },
    ErrorDefault {
        kind: ErrorKind::MaintenanceMode,
        status: 503,
        title: "Service Unavailable",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::TokenMismatch,
        status: 419,
        title: "Invalid Token",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::UnsupportedMediaType,
        status: 415,
        title: "Unsupported Media Type",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::MethodNotAllowed,
        status: 405,
        title: "Method Not Allowed",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::PayloadTooLarge,
        status: 413,
        title: "Payload Too Large",
        detail: None,
        code: None,
    },
    ErrorDefault {
        kind: ErrorKind::Generic,
        status: 500,
        title: "Internal Server Error",
        detail: None,
        code: None,
    },
];

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        Self::NotFound,
        Self::DocumentRequired,
        Self::InvalidJson,
        Self::MaintenanceMode,
        Self::TokenMismatch,
        Self::UnsupportedMediaType,
        Self::MethodNotAllowed,
        Self::PayloadTooLarge,
        Self::Generic,
    ];

    /// Key used for this kind in the override table
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DocumentRequired => "document_required",
            Self::InvalidJson => "invalid_json",
            Self::MaintenanceMode => "maintenance_mode",
            Self::TokenMismatch => "token_mismatch",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Generic => "generic",
        }
    }

    pub fn defaults(&self) -> &'static ErrorDefault {
        // DEFAULTS is declared in the same order as the enum.
        &DEFAULTS[*self as usize]
    }

    /// Get HTTP status code for this kind
    pub fn status_code(&self) -> u16 {
        self.defaults().status
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind: {0}")]
pub struct UnknownErrorKind(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == s)
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_table_is_indexed_by_kind() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.defaults().kind, kind);
        }
    }

    #[test]
    fn test_error_kind_status_codes() {
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::DocumentRequired.status_code(), 400);
        assert_eq!(ErrorKind::InvalidJson.status_code(), 400);
        assert_eq!(ErrorKind::MethodNotAllowed.status_code(), 405);
        assert_eq!(ErrorKind::PayloadTooLarge.status_code(), 413);
        assert_eq!(ErrorKind::UnsupportedMediaType.status_code(), 415);
        assert_eq!(ErrorKind::TokenMismatch.status_code(), 419);
        assert_eq!(ErrorKind::Generic.status_code(), 500);
        assert_eq!(ErrorKind::MaintenanceMode.status_code(), 503);
    }

    #[test]
    fn test_identifier_matches_serde_name() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.identifier()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "invalid_json".parse::<ErrorKind>(),
            Ok(ErrorKind::InvalidJson)
        );
        assert_eq!(
            "InvalidJson".parse::<ErrorKind>(),
            Err(UnknownErrorKind("InvalidJson".to_string()))
        );
    }

    #[test]
    fn test_invalid_json_default_carries_code() {
        let default = ErrorKind::InvalidJson.defaults();
        assert_eq!(default.title, "Invalid JSON");
        assert_eq!(default.detail, Some("Syntax error"));
        assert_eq!(default.code, Some(4));
    }
}
