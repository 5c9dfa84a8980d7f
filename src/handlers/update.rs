use crate::error::{ApiError, ErrorResponse};
use crate::models::{PostResponse, UpdatePostRequest};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::rejection::JsonRejection, extract::Path, extract::State, http::StatusCode, Json,
};

/// PATCH /post-api/v1/posts/:id handler - Merge a partial update into a post
///
/// Only the fields present in the body are changed; `updatedAt` is always
/// refreshed. Updating an unknown id is a 404 and stores nothing.
#[utoipa::path(
    patch,
    path = routes::POST_ITEM,
    params(
        ("id" = String, Path, description = "Post identifier")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Blank field, unknown status, or invalid JSON", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "posts"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let Json(request) = payload?;

    match state.posts.update(&id, request.into()).await? {
        Some(post) => {
            tracing::info!("Successfully updated post with id: {}", id);
            Ok((StatusCode::OK, Json(PostResponse::from(post))))
        }
        None => {
            tracing::info!("Cannot update, post not found with id: {}", id);
            Err(ApiError::PostNotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{item_uri, json_body, send, test_app};
    use crate::post::Status;
    use axum::Router;

    async fn create_post(app: &Router) -> PostResponse {
        let response = send(
            app,
            "POST",
            routes::POSTS,
            Some(serde_json::json!({
                "title": "Hello",
                "content": "World",
                "status": "DRAFT"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_update_endpoint_merges_fields() {
        let app = test_app();
        let created = create_post(&app).await;

        let response = send(
            &app,
            "PATCH",
            &item_uri(&created.id),
            Some(serde_json::json!({ "content": "Everyone" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let updated: PostResponse = json_body(response).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Hello");
        assert_eq!(updated.content, "Everyone");
        assert_eq!(updated.status, Status::Draft);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.unwrap() >= created.created_at);
    }

    #[tokio::test]
    async fn test_update_endpoint_empty_body_refreshes_timestamp() {
        let app = test_app();
        let created = create_post(&app).await;

        let response = send(&app, "PATCH", &item_uri(&created.id), Some(serde_json::json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let updated: PostResponse = json_body(response).await;
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.status, created.status);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_endpoint_not_found() {
        let app = test_app();
        let missing = uuid::Uuid::new_v4().to_string();

        let response = send(
            &app,
            "PATCH",
            &item_uri(&missing),
            Some(serde_json::json!({ "status": "PUBLISHED" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Nothing was created as a side effect
        let response = send(&app, "GET", &item_uri(&missing), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_endpoint_blank_title() {
        let app = test_app();
        let created = create_post(&app).await;

        let response = send(
            &app,
            "PATCH",
            &item_uri(&created.id),
            Some(serde_json::json!({ "title": "" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = json_body(response).await;
        assert!(error.error.contains("title"));
    }

    #[tokio::test]
    async fn test_update_endpoint_unknown_status() {
        let app = test_app();
        let created = create_post(&app).await;

        let response = send(
            &app,
            "PATCH",
            &item_uri(&created.id),
            Some(serde_json::json!({ "status": "DELETED" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
