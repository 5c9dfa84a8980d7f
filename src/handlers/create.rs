use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreatePostRequest, PostResponse};
use crate::post::NewPost;
use crate::routes;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// POST /post-api/v1/posts handler - Create a post
#[utoipa::path(
    post,
    path = routes::POSTS,
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing or blank field, unknown status, or invalid JSON", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let Json(request) = payload?;
    let new_post = NewPost::try_from(request)?;

    let post = state.posts.create(new_post).await?;

    tracing::info!("Created post with id: {}", post.id);
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}
