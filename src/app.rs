use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, liveness_handler, update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Build the full HTTP application
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTHCHECK, get(liveness_handler))
        .route(routes::HEALTH, get(health_handler))
        .route(routes::POSTS, post(create_handler))
        .route(
            routes::POST_ITEM,
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::models::PostResponse;
    use crate::post::Status;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_post_lifecycle_over_http() {
        let app = test_app();

        let response = send(
            &app,
            "POST",
            crate::routes::POSTS,
            Some(serde_json::json!({
                "title": "Hello",
                "content": "World",
                "status": "DRAFT"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: PostResponse = json_body(response).await;
        assert_eq!(created.updated_at, None);

        let response = send(
            &app,
            "PATCH",
            &item_uri(&created.id),
            Some(serde_json::json!({ "status": "PUBLISHED" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let published: PostResponse = json_body(response).await;
        assert_eq!(published.title, "Hello");
        assert_eq!(published.content, "World");
        assert_eq!(published.status, Status::Published);
        assert_eq!(published.created_at, created.created_at);
        assert!(published.updated_at.is_some());

        let response = send(&app, "GET", &item_uri(&created.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: PostResponse = json_body(response).await;
        assert_eq!(fetched.status, Status::Published);
        assert_eq!(fetched.updated_at, published.updated_at);

        let response = send(&app, "DELETE", &item_uri(&created.id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", &item_uri(&created.id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = test_app();

        let response = send(&app, "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc: serde_json::Value = json_body(response).await;
        assert!(doc["paths"].get(crate::routes::POSTS).is_some());
        assert!(doc["paths"].get(crate::routes::POST_ITEM).is_some());
    }
}
