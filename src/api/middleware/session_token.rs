use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::errors::AppError;

pub const TOKEN_HEADER: &str = "x-csrf-token";

/// Reject state-changing requests that do not present the session token.
/// Disabled when no token is configured.
pub async fn verify_session_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.api.session_token.as_deref() else {
        return next.run(request).await;
    };

    if is_reading(request.method()) {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(token) if tokens_match(token, expected) => next.run(request).await,
        _ => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Session token mismatch"
            );
            AppError::token_mismatch().into_response()
        }
    }
}

fn is_reading(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Comparison time does not depend on where the tokens differ.
/// A length mismatch still runs a comparison of the same cost.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    presented.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cret", "s3creT"));
        assert!(!tokens_match("s3cret", "s3cret-longer"));
        assert!(!tokens_match("", "s3cret"));
    }

    #[test]
    fn test_reading_methods() {
        assert!(is_reading(&Method::GET));
        assert!(is_reading(&Method::HEAD));
        assert!(!is_reading(&Method::POST));
        assert!(!is_reading(&Method::DELETE));
    }
}
