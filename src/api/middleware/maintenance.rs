use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::render::request_settings;
use crate::api::handlers::AppState;
use crate::errors::AppError;

/// Answer 503 on every route but operational ones while maintenance is active
pub async fn maintenance_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let settings = request_settings(&state, &request);
    match &settings.maintenance {
        Some(maintenance) => {
            debug!(path = %request.uri().path(), "Rejecting request during maintenance");
            AppError::MaintenanceMode {
                message: maintenance.message.clone(),
                retry_after: maintenance.retry_after,
            }
            .into_response()
        }
        None => next.run(request).await,
    }
}

fn is_exempt(path: &str) -> bool {
    matches!(path, "/health" | "/metrics" | "/admin") || path.starts_with("/admin/")
}
