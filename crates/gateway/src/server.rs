//! Axum-based HTTP server for the gateway.

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use redacta_core::{
    config::ServerConfig, Error, EvaluationRequest, Result, TransformationRequest,
    WordDifficulty,
};
use redacta_orchestrator::Orchestrator;

use crate::error::ApiError;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

impl From<&ServerConfig> for GatewayConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            enable_cors: server.enable_cors,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(config: GatewayConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { orchestrator }),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/transform", post(transform_handler))
            .route("/v1/evaluate", post(evaluate_handler))
            .route("/v1/suggestions", post(suggestions_handler))
            .route("/v1/cache/stats", get(cache_stats_handler))
            .route("/v1/cache/owner/{owner_id}", delete(invalidate_owner_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::gateway(format!("Failed to bind: {}", e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::gateway(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Suggestion request.
#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub text: String,
    #[serde(default)]
    pub word_difficulty: WordDifficulty,
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Owner invalidation response.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Session entries removed.
    pub removed: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn transform_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TransformationRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let trace_id = Uuid::new_v4().to_string();

    tracing::info!(
        trace_id = %trace_id,
        transformation = %request.transformation_type(),
        text_len = request.text.len(),
        "Processing transform request"
    );

    let result = state
        .orchestrator
        .transform(&request, None)
        .await
        .map_err(|e| ApiError::from_error(&e, &trace_id))?;
    Ok(Json(result))
}

async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EvaluationRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let trace_id = Uuid::new_v4().to_string();

    tracing::info!(
        trace_id = %trace_id,
        essay_len = request.essay.len(),
        "Processing evaluate request"
    );

    let result = state
        .orchestrator
        .evaluate(&request)
        .await
        .map_err(|e| ApiError::from_error(&e, &trace_id))?;
    Ok(Json(result))
}

async fn suggestions_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SuggestionsRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(&e))?;
    let trace_id = Uuid::new_v4().to_string();

    let result = state
        .orchestrator
        .suggest(
            &request.text,
            request.word_difficulty,
            request.owner_id.as_deref(),
        )
        .map_err(|e| ApiError::from_error(&e, &trace_id))?;
    Ok(Json(result))
}

async fn cache_stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.orchestrator.cache().stats())
}

async fn invalidate_owner_handler(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> impl IntoResponse {
    let removed = state.orchestrator.cache().invalidate_owner(&owner_id);
    tracing::info!(owner = %owner_id, removed, "Owner session entries invalidated");
    (StatusCode::OK, Json(InvalidateResponse { removed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_config_from_server_section() {
        let server = ServerConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            enable_cors: false,
        };
        let config = GatewayConfig::from(&server);
        assert_eq!(config.port, 8080);
        assert!(!config.enable_cors);
        assert!(config.enable_tracing);
    }
}
