use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use redacta_core::mocks::MockLlm;
use redacta_gateway::{GatewayConfig, GatewayServer};
use redacta_orchestrator::Orchestrator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SCORE_JSON: &str = r#"{"competencies":[{"score":120},{"score":140},{"score":160},{"score":120},{"score":100}],"generalFeedback":"Bom texto."}"#;

fn app_with(orchestrator: Orchestrator) -> Router {
    GatewayServer::new(GatewayConfig::default(), Arc::new(orchestrator)).build_router()
}

fn app() -> Router {
    app_with(Orchestrator::builder().build().unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_transform_then_cache_hit() {
    let app = app();
    let body = json!({
        "text": "Isso é muito importante.",
        "config": { "type": "synonym_enrichment", "word_difficulty": "medium" },
        "owner_id": "aluno-1"
    });

    let response = app
        .clone()
        .oneshot(post_json("/v1/transform", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["source"], "local");
    assert!(first["content"].as_str().unwrap().contains("fundamental"));

    let response = app
        .clone()
        .oneshot(post_json("/v1/transform", body))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["source"], "cache");
    assert_eq!(second["content"], first["content"]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/cache/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let stats = body_json(response).await;
    assert!(stats["total_hits"].as_u64().unwrap() >= 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/cache/owner/aluno-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let removed = body_json(response).await;
    assert_eq!(removed["removed"], 1);
}

#[tokio::test]
async fn test_validation_error_is_400() {
    let response = app()
        .oneshot(post_json(
            "/v1/transform",
            json!({ "text": "  ", "config": { "type": "normalize" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(!json["trace_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_transformation_type_is_400() {
    let response = app()
        .oneshot(post_json(
            "/v1/transform",
            json!({ "text": "Texto.", "config": { "type": "poetry" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_evaluate_endpoint() {
    let orchestrator = Orchestrator::builder()
        .with_llm(Arc::new(MockLlm::constant(SCORE_JSON)))
        .build()
        .unwrap();

    let response = app_with(orchestrator)
        .oneshot(post_json(
            "/v1/evaluate",
            json!({ "essay": "A mobilidade urbana é um desafio.", "theme": "Mobilidade" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "llm");
    assert_eq!(json["evaluation"]["total_score"], 640);
    assert_eq!(json["evaluation"]["competencies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_suggestions_endpoint() {
    let app = app();
    let body = json!({ "text": "Isso é importante, mas difícil.", "word_difficulty": "medium" });

    let response = app
        .clone()
        .oneshot(post_json("/v1/suggestions", body.clone()))
        .await
        .unwrap();
    let first = body_json(response).await;
    assert_eq!(first["cached"], false);
    assert!(first["suggestions"]
        .as_array()
        .unwrap()
        .contains(&json!("mas → contudo")));

    let response = app.oneshot(post_json("/v1/suggestions", body)).await.unwrap();
    assert_eq!(body_json(response).await["cached"], true);
}
