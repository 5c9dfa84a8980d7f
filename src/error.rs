use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::PostError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoints
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Maps client input problems to 400, absent posts to 404 and store
/// failures to 500, always with a JSON `ErrorResponse` body.
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed field validation
    Validation(String),
    /// No post stored under this id
    PostNotFound(String),
    /// Database operation error
    DatabaseError(anyhow::Error),
    /// Request body is not valid JSON for the expected shape
    JsonError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PostNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Post not found: {}", id),
            ),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", err),
                )
            }
            ApiError::JsonError(msg) => (
                StatusCode::BAD_REQUEST,
                format!("JSON parse error: {}", msg),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::Validation { .. } => ApiError::Validation(err.to_string()),
            PostError::Store(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::JsonError(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let err: ApiError = PostError::validation("title", "must not be blank").into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.error, "Validation failed: title: must not be blank");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = ApiError::PostNotFound("abc".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "Post not found: abc");
    }

    #[tokio::test]
    async fn test_store_error_maps_to_500() {
        let err: ApiError = PostError::Store(anyhow::anyhow!("deadline exceeded")).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_of(response).await.error.contains("deadline exceeded"));
    }
}
