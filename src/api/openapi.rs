use utoipa::OpenApi;

use crate::errors::{ErrorDocument, ErrorKind, ErrorObject, ErrorOverride, ErrorOverrides};
use crate::models::{CollectionDocument, Resource, ResourceDocument};
use crate::settings::Maintenance;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "JSON API Errors",
        version = "0.1.0",
        description = "Demonstration JSON API service. Every failure is rendered as a JSON API error document with the application/vnd.api+json media type; titles and details can be overridden per error kind at runtime.",
        contact(
            name = "JSON API Errors",
        )
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_posts,
        crate::api::handlers::get_post,
        crate::api::handlers::create_post,
        crate::api::handlers::get_error_overrides,
        crate::api::handlers::put_error_overrides,
        crate::api::handlers::put_maintenance,
        crate::api::handlers::delete_maintenance,
    ),
    components(
        schemas(
            ErrorDocument,
            ErrorObject,
            ErrorKind,
            ErrorOverride,
            ErrorOverrides,
            Maintenance,
            Resource,
            ResourceDocument,
            CollectionDocument,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "posts", description = "Demonstration JSON API resource"),
        (name = "admin", description = "Runtime error settings"),
    )
)]
pub struct ApiDoc;
