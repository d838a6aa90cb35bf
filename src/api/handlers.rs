use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::extract::{AdminJson, JsonApiDocument};
use crate::config::ApiConfig;
use crate::errors::{AppError, ErrorOverrides};
use crate::media::{accepts_json_api, JsonApi};
use crate::models::{CollectionDocument, PostCatalog, Resource, ResourceDocument, POST_TYPE};
use crate::settings::{Maintenance, SettingsStore};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub settings: SettingsStore,
    pub catalog: PostCatalog,
    pub api: ApiConfig,
    pub instance_id: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.settings.snapshot();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "jsonapi-errors",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "maintenance": settings.maintenance.is_some(),
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// List posts
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts", body = CollectionDocument, content_type = "application/vnd.api+json"),
        (status = 503, description = "Maintenance mode", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json")
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> JsonApi<CollectionDocument> {
    let data = state
        .catalog
        .list()
        .into_iter()
        .map(|post| post.to_resource())
        .collect();

    JsonApi(StatusCode::OK, CollectionDocument { data })
}

/// Get a post by id
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = ResourceDocument, content_type = "application/vnd.api+json"),
        (status = 404, description = "Post not found", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<JsonApi<ResourceDocument>, AppError> {
    let post = state.catalog.get(&id).ok_or_else(|| {
        info!("Post not found: {}", id);
        AppError::NotFound
    })?;

    Ok(JsonApi(
        StatusCode::OK,
        ResourceDocument {
            data: post.to_resource(),
        },
    ))
}

/// Validate a new post document and echo it back with a generated id.
/// Nothing is stored.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body(content = ResourceDocument, content_type = "application/vnd.api+json"),
    responses(
        (status = 201, description = "Post accepted", body = ResourceDocument, content_type = "application/vnd.api+json"),
        (status = 400, description = "Missing document or invalid JSON", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json"),
        (status = 415, description = "Wrong content type", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json"),
        (status = 419, description = "Session token mismatch", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    JsonApiDocument(document): JsonApiDocument,
) -> Result<Response, AppError> {
    let attributes = document["data"]
        .get("attributes")
        .filter(|attributes| attributes.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    let resource = Resource {
        resource_type: POST_TYPE.to_string(),
        id: Uuid::new_v4().to_string(),
        attributes,
    };
    info!("Accepted new post {}", resource.id);

    let location = format!(
        "{}/posts/{}",
        state.api.prefix.trim_end_matches('/'),
        resource.id
    );
    let location = HeaderValue::from_str(&location)
        .map_err(|e| AppError::internal(format!("Invalid Location header: {}", e)))?;

    let mut response =
        JsonApi(StatusCode::CREATED, ResourceDocument { data: resource }).into_response();
    response.headers_mut().insert(header::LOCATION, location);

    Ok(response)
}

/// Current error override table
#[utoipa::path(
    get,
    path = "/admin/error-overrides",
    tag = "admin",
    responses(
        (status = 200, description = "Override table keyed by error kind", body = ErrorOverrides)
    )
)]
pub async fn get_error_overrides(State(state): State<AppState>) -> Json<ErrorOverrides> {
    Json(state.settings.snapshot().overrides.clone())
}

/// Replace the error override table
#[utoipa::path(
    put,
    path = "/admin/error-overrides",
    tag = "admin",
    request_body = ErrorOverrides,
    responses(
        (status = 200, description = "Override table replaced", body = ErrorOverrides),
        (status = 400, description = "Invalid JSON or malformed table", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json")
    )
)]
pub async fn put_error_overrides(
    State(state): State<AppState>,
    AdminJson(overrides): AdminJson<ErrorOverrides>,
) -> Json<ErrorOverrides> {
    state.settings.replace_overrides(overrides.clone());
    Json(overrides)
}

/// Enter maintenance mode
#[utoipa::path(
    put,
    path = "/admin/maintenance",
    tag = "admin",
    request_body = Maintenance,
    responses(
        (status = 200, description = "Maintenance mode enabled", body = Maintenance),
        (status = 400, description = "Invalid JSON or missing message", body = crate::errors::ErrorDocument, content_type = "application/vnd.api+json")
    )
)]
pub async fn put_maintenance(
    State(state): State<AppState>,
    AdminJson(maintenance): AdminJson<Maintenance>,
) -> Json<Maintenance> {
    state.settings.set_maintenance(Some(maintenance.clone()));
    Json(maintenance)
}

/// Leave maintenance mode
#[utoipa::path(
    delete,
    path = "/admin/maintenance",
    tag = "admin",
    responses(
        (status = 204, description = "Maintenance mode disabled")
    )
)]
pub async fn delete_maintenance(State(state): State<AppState>) -> StatusCode {
    state.settings.set_maintenance(None);
    StatusCode::NO_CONTENT
}

/// Unmatched routes. JSON API clients get an error document.
pub async fn fallback(headers: HeaderMap) -> Response {
    if accepts_json_api(&headers) {
        AppError::NotFound.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}
