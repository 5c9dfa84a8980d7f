use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, extract::Path, http::StatusCode};

/// DELETE /post-api/v1/posts/:id handler - Remove a post
///
/// Always 204, whether or not the post existed.
#[utoipa::path(
    delete,
    path = routes::POST_ITEM,
    params(
        ("id" = String, Path, description = "Post identifier")
    ),
    responses(
        (status = 204, description = "Post removed or already absent"),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(&id).await?;

    tracing::info!("Deleted post with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{item_uri, send, test_app};

    #[tokio::test]
    async fn test_delete_endpoint_existing_post() {
        let app = test_app();

        let response = send(
            &app,
            "POST",
            routes::POSTS,
            Some(serde_json::json!({
                "title": "Hello",
                "content": "World",
                "status": "PUBLISHED"
            })),
        )
        .await;
        let created: crate::models::PostResponse =
            crate::app::test_support::json_body(response).await;

        let response = send(&app, "DELETE", &item_uri(&created.id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());

        let response = send(&app, "GET", &item_uri(&created.id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_endpoint_unknown_post() {
        let app = test_app();

        let response = send(&app, "DELETE", &item_uri("never-created"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
