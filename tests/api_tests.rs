use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "fleet-maintenance");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_generate_endpoint_shape() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/tasks/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["created"].is_number());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Función helper para crear la app de test (router básico sin base de datos)
async fn create_test_app() -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async {
                Json(json!({ "service": "fleet-maintenance", "status": "healthy" }))
            }),
        )
        .route(
            "/api/tasks/generate",
            post(|| async {
                Json(json!({ "success": true, "data": { "created": 0 } }))
            }),
        )
}
