use crate::error::{HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /healthcheck handler - Process liveness
///
/// Constant answer; does not touch the store.
#[utoipa::path(
    get,
    path = routes::HEALTHCHECK,
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn liveness_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// GET /health handler - Readiness check
///
/// Pings the post table to verify database connectivity.
/// Returns 200 OK if the database is reachable, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    match state.posts.ping().await {
        Ok(_) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy".to_string(),
                    error: format!("Cannot connect to database: {}", e),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{json_body, send, test_app};
    use crate::post::{Post, PostPatch};
    use crate::store::{PostStore, PostTable};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    struct DownTable;

    #[async_trait]
    impl PostTable for DownTable {
        async fn put(&self, _post: &Post) -> anyhow::Result<()> {
            unreachable!()
        }

        async fn get(&self, _id: &str) -> anyhow::Result<Option<Post>> {
            unreachable!()
        }

        async fn merge(
            &self,
            _id: &str,
            _patch: &PostPatch,
            _updated_at: DateTime<Utc>,
        ) -> anyhow::Result<Option<Post>> {
            unreachable!()
        }

        async fn delete(&self, _id: &str) -> anyhow::Result<()> {
            unreachable!()
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("transport error"))
        }
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let app = test_app();

        let response = send(&app, "GET", routes::HEALTHCHECK, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let response_json: serde_json::Value = json_body(response).await;
        assert_eq!(response_json, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_health_endpoint_healthy() {
        let app = test_app();

        let response = send(&app, "GET", routes::HEALTH, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let response_json: HealthResponse = json_body(response).await;
        assert_eq!(response_json.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_endpoint_unhealthy() {
        let state = AppState {
            posts: PostStore::new(Arc::new(DownTable)),
        };
        let app = crate::app::router(state);

        let response = send(&app, "GET", routes::HEALTH, None).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let response_json: UnhealthyResponse = json_body(response).await;
        assert_eq!(response_json.status, "unhealthy");
        assert!(response_json.error.contains("transport error"));
    }
}
