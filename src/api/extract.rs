use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;
use tracing::debug;

use crate::errors::{AppError, JsonFault};
use crate::media::{is_json_api_content_type, JSON_API_MEDIA_TYPE};

/// Request body holding a JSON API document (an object with `data`).
///
/// Rejections, in order of precedence: body over the size limit ->
/// PayloadTooLarge, empty body -> DocumentRequired, wrong content type -> UnsupportedMediaType,
/// undecodable body -> InvalidJson, anything but `{"data": ..}` -> DocumentRequired.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonApiDocument(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonApiDocument
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_api_content = is_json_api_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(AppError::from)?;

        parse_document(&bytes, json_api_content).map(JsonApiDocument)
    }
}

/// Plain JSON body whose rejections render as error documents
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AdminJson<T>(pub T);

pub fn parse_document(bytes: &[u8], json_api_content: bool) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::DocumentRequired);
    }

    if !json_api_content {
        return Err(AppError::UnsupportedMediaType(format!(
            "Request content must use the {} media type.",
            JSON_API_MEDIA_TYPE
        )));
    }

    if std::str::from_utf8(bytes).is_err() {
        return Err(AppError::InvalidJson(JsonFault::Utf8));
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        debug!("Request body is not valid JSON: {}", e);
        AppError::InvalidJson(JsonFault::from(&e))
    })?;

    match &value {
        Value::Object(members) if members.contains_key("data") => Ok(value),
        _ => Err(AppError::DocumentRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_requires_document() {
        assert_eq!(parse_document(b"", true), Err(AppError::DocumentRequired));
        assert_eq!(parse_document(b"  \n", false), Err(AppError::DocumentRequired));
    }

    #[test]
    fn test_content_type_checked_before_decoding() {
        assert!(matches!(
            parse_document(b"{not json", false),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert_eq!(
            parse_document(b"{\"data\": {", true),
            Err(AppError::InvalidJson(JsonFault::Syntax))
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            parse_document(b"{\"data\": \"\xff\"}", true),
            Err(AppError::InvalidJson(JsonFault::Utf8))
        );
    }

    #[test]
    fn test_document_without_data() {
        assert_eq!(parse_document(b"[]", true), Err(AppError::DocumentRequired));
        assert_eq!(parse_document(b"null", true), Err(AppError::DocumentRequired));
        assert_eq!(
            parse_document(b"{\"meta\": {}}", true),
            Err(AppError::DocumentRequired)
        );
    }

    #[test]
    fn test_valid_document() {
        assert_eq!(
            parse_document(br#"{"data": {"type": "posts"}}"#, true),
            Ok(json!({"data": {"type": "posts"}}))
        );
    }
}
