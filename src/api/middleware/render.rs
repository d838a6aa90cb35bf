use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::errors::{render, AppError};
use crate::media::accepts_json_api;
use crate::settings::ErrorSettings;

/// Takes the request's settings snapshot and turns any [`AppError`] raised
/// further in into its JSON API document. The router's bare 405 becomes a
/// MethodNotAllowed document for JSON API clients.
///
/// Inner layers find the snapshot in the request extensions.
pub async fn render_errors(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let settings = state.settings.snapshot();
    let json_api = accepts_json_api(request.headers());
    request.extensions_mut().insert(Arc::clone(&settings));

    let mut response = next.run(request).await;

    if let Some(err) = response.extensions_mut().remove::<AppError>() {
        return render(&err, &settings.overrides).into_response();
    }

    if json_api && response.status() == StatusCode::METHOD_NOT_ALLOWED {
        let allow = response.headers().get(header::ALLOW).cloned();
        let mut rendered = render(&AppError::MethodNotAllowed, &settings.overrides).into_response();
        if let Some(allow) = allow {
            rendered.headers_mut().insert(header::ALLOW, allow);
        }
        return rendered;
    }

    response
}

/// Snapshot inserted by [`render_errors`], or a fresh one when that layer is absent
pub fn request_settings(state: &AppState, request: &Request) -> Arc<ErrorSettings> {
    request
        .extensions()
        .get::<Arc<ErrorSettings>>()
        .cloned()
        .unwrap_or_else(|| state.settings.snapshot())
}

/// Panic hook for `CatchPanicLayer`
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(format!("Handler panicked: {}", message)).into_response()
}
