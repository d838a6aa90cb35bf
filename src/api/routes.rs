use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    create_post, delete_maintenance, fallback, get_error_overrides, get_post, health, list_posts,
    put_error_overrides, put_maintenance, AppState,
};
use super::middleware::{
    handle_panic, logging_middleware, maintenance_guard, render_errors, verify_session_token,
};
use super::openapi::ApiDoc;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    let json_api = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(get_post));

    let router = Router::new()
        // Health check
        .route("/health", get(health))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // Admin endpoints
        .route(
            "/admin/error-overrides",
            get(get_error_overrides).put(put_error_overrides),
        )
        .route(
            "/admin/maintenance",
            put(put_maintenance).delete(delete_maintenance),
        )
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Nesting at the root is not allowed
    let router = if state.api.prefix == "/" {
        router.merge(json_api)
    } else {
        router.nest(&state.api.prefix, json_api)
    };

    with_error_layers(router, state)
}

/// Fallback plus the middleware stack every route runs behind
pub fn with_error_layers(router: Router<AppState>, state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Order matters, outermost last: trace -> cors -> metrics -> logging -> compression
    // -> error rendering -> maintenance -> session token -> panic recovery -> handler
    router
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            verify_session_token,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            maintenance_guard,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), render_errors))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
