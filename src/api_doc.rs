use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreatePostRequest, PostResponse, UpdatePostRequest};
use crate::post::Status;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-posts API",
        version = "1.0.0",
        description = "CRUD service for blog posts backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::liveness_handler,
        handlers::health::health_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            CreatePostRequest,
            UpdatePostRequest,
            PostResponse,
            Status,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "posts", description = "Post operations")
    )
)]
pub struct ApiDoc;
