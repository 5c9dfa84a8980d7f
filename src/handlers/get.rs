use crate::error::{ApiError, ErrorResponse};
use crate::models::PostResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// GET /post-api/v1/posts/:id handler - Retrieve a post
#[utoipa::path(
    get,
    path = routes::POST_ITEM,
    params(
        ("id" = String, Path, description = "Post identifier")
    ),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    match state.posts.get(&id).await? {
        Some(post) => {
            tracing::info!("Successfully retrieved post with id: {}", id);
            Ok((StatusCode::OK, Json(PostResponse::from(post))))
        }
        None => {
            tracing::info!("Post not found with id: {}", id);
            Err(ApiError::PostNotFound(id))
        }
    }
}
