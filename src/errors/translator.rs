//! Error translation: raised error + override table -> JSON API error document

use tracing::{debug, error};

use super::app_error::AppError;
use super::overrides::ErrorOverrides;
use super::response::{ErrorObject, ErrorResponse};
use crate::metrics::{ERROR_DOCUMENTS_TOTAL, ERROR_OVERRIDES_APPLIED_TOTAL};

/// Translate an error into its response.
///
/// A configured override replaces the whole body: the object becomes
/// `{status, title, detail}` and any default code is dropped. Status always
/// comes from the kind's default.
pub fn translate(err: &AppError, overrides: &ErrorOverrides) -> ErrorResponse {
    translate_outcome(err, overrides).0
}

/// Translate and record the outcome. Used once per failed request.
pub fn render(err: &AppError, overrides: &ErrorOverrides) -> ErrorResponse {
    let kind = err.kind();
    if let AppError::Internal(cause) = err {
        error!(kind = %kind, "Request failed: {}", cause);
    }

    let (response, overridden) = translate_outcome(err, overrides);

    ERROR_DOCUMENTS_TOTAL
        .with_label_values(&[kind.identifier(), &response.status.to_string()])
        .inc();
    if overridden {
        ERROR_OVERRIDES_APPLIED_TOTAL
            .with_label_values(&[kind.identifier()])
            .inc();
    }

    response
}

/// The response, and whether an override produced its body
fn translate_outcome(err: &AppError, overrides: &ErrorOverrides) -> (ErrorResponse, bool) {
    let default = err.kind().defaults();

    let (object, overridden) = match overrides.get(default.kind) {
        Some(replacement) => {
            debug!(kind = %default.kind, "Applying configured error override");
            let object = ErrorObject::new(default.status, replacement.title.clone())
                .with_detail(replacement.detail.clone());
            (object, true)
        }
        None => {
            let mut object = ErrorObject::new(default.status, default.title);
            if let Some(detail) = err.detail().or_else(|| default.detail.map(str::to_string)) {
                object = object.with_detail(detail);
            }
            if let Some(code) = err.code().or(default.code) {
                object = object.with_code(code);
            }
            (object, false)
        }
    };

    let response = ErrorResponse::new(default.status, object).with_retry_after(err.retry_after());
    (response, overridden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::app_error::JsonFault;
    use crate::errors::kind::ErrorKind;
    use serde_json::json;

    fn body(err: &AppError, overrides: &ErrorOverrides) -> serde_json::Value {
        serde_json::to_value(translate(err, overrides).document).unwrap()
    }

    #[test]
    fn test_not_found_has_no_detail() {
        assert_eq!(
            body(&AppError::NotFound, &ErrorOverrides::new()),
            json!({"errors": [{"status": "404", "title": "Not Found"}]})
        );
    }

    #[test]
    fn test_document_required() {
        assert_eq!(
            body(&AppError::DocumentRequired, &ErrorOverrides::new()),
            json!({"errors": [{
                "status": "400",
                "title": "Document Required",
                "detail": "Expecting request to contain a JSON API document."
            }]})
        );
    }

    #[test]
    fn test_invalid_json_keeps_code() {
        assert_eq!(
            body(&AppError::InvalidJson(JsonFault::Syntax), &ErrorOverrides::new()),
            json!({"errors": [{
                "status": "400",
                "title": "Invalid JSON",
                "detail": "Syntax error",
                "code": 4
            }]})
        );
    }

    #[test]
    fn test_invalid_utf8_code() {
        let response = translate(&AppError::InvalidJson(JsonFault::Utf8), &ErrorOverrides::new());
        let error = &response.document.errors[0];
        assert_eq!(error.code, Some(5));
        assert_eq!(
            error.detail.as_deref(),
            Some("Malformed UTF-8 characters, possibly incorrectly encoded")
        );
    }

    #[test]
    fn test_maintenance_detail_and_retry() {
        let err = AppError::MaintenanceMode {
            message: "Back soon.".to_string(),
            retry_after: Some(120),
        };
        let response = translate(&err, &ErrorOverrides::new());
        assert_eq!(response.status, 503);
        assert_eq!(response.retry_after, Some(120));
        assert_eq!(
            serde_json::to_value(&response.document).unwrap(),
            json!({"errors": [{
                "status": "503",
                "title": "Service Unavailable",
                "detail": "Back soon."
            }]})
        );
    }

    #[test]
    fn test_token_mismatch_uses_message() {
        assert_eq!(
            body(&AppError::token_mismatch(), &ErrorOverrides::new()),
            json!({"errors": [{
                "status": "419",
                "title": "Invalid Token",
                "detail": "CSRF token mismatch."
            }]})
        );
    }

    #[test]
    fn test_generic_hides_cause() {
        assert_eq!(
            body(&AppError::internal("secret stack trace"), &ErrorOverrides::new()),
            json!({"errors": [{"status": "500", "title": "Internal Server Error"}]})
        );
    }

    #[test]
    fn test_override_replaces_body_and_drops_code() {
        let overrides = ErrorOverrides::new().with(
            ErrorKind::InvalidJson,
            "Malformed Payload",
            "The request body could not be decoded.",
        );
        assert_eq!(
            body(&AppError::InvalidJson(JsonFault::Syntax), &overrides),
            json!({"errors": [{
                "status": "400",
                "title": "Malformed Payload",
                "detail": "The request body could not be decoded."
            }]})
        );
    }

    #[test]
    fn test_override_for_other_kind_is_ignored() {
        let overrides = ErrorOverrides::new().with(ErrorKind::NotFound, "Gone", "Nothing here.");
        let response = translate(&AppError::DocumentRequired, &overrides);
        assert_eq!(response.document.errors[0].title, "Document Required");
    }

    #[test]
    fn test_override_keeps_retry_after() {
        let overrides =
            ErrorOverrides::new().with(ErrorKind::MaintenanceMode, "Upgrading", "Try again later.");
        let err = AppError::MaintenanceMode {
            message: "Down.".to_string(),
            retry_after: Some(30),
        };
        let response = translate(&err, &overrides);
        assert_eq!(response.status, 503);
        assert_eq!(response.retry_after, Some(30));
        assert_eq!(response.document.errors[0].detail.as_deref(), Some("Try again later."));
    }

    #[test]
    fn test_translation_is_idempotent() {
        let overrides = ErrorOverrides::new().with(ErrorKind::NotFound, "Gone", "Nothing here.");
        let first = serde_json::to_vec(&translate(&AppError::NotFound, &overrides).document).unwrap();
        let second = serde_json::to_vec(&translate(&AppError::NotFound, &overrides).document).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_outcome_reports_override() {
        let overrides = ErrorOverrides::new().with(ErrorKind::NotFound, "Gone", "Nothing here.");
        assert!(translate_outcome(&AppError::NotFound, &overrides).1);
        assert!(!translate_outcome(&AppError::DocumentRequired, &overrides).1);
        assert!(!translate_outcome(&AppError::NotFound, &ErrorOverrides::new()).1);
    }

    #[test]
    fn test_method_not_allowed_and_payload_too_large() {
        assert_eq!(
            body(&AppError::MethodNotAllowed, &ErrorOverrides::new()),
            json!({"errors": [{"status": "405", "title": "Method Not Allowed"}]})
        );
        assert_eq!(
            body(
                &AppError::PayloadTooLarge("Request body exceeds the allowed size.".to_string()),
                &ErrorOverrides::new()
            ),
            json!({"errors": [{
                "status": "413",
                "title": "Payload Too Large",
                "detail": "Request body exceeds the allowed size."
            }]})
        );
    }

    #[test]
    fn test_render_matches_translate() {
        let err = AppError::DocumentRequired;
        assert_eq!(
            render(&err, &ErrorOverrides::new()),
            translate(&err, &ErrorOverrides::new())
        );
    }
}
