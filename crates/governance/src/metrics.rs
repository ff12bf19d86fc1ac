//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use redacta_core::{Error, LlmUsage, Result, SourceTag};

/// Initialize Prometheus recorder and return the handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::internal(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Count a finished pipeline request and record its latency.
///
/// `flow` is `transform`, `evaluate` or `suggest`.
pub fn track_request(flow: &str, source: SourceTag, latency_sec: f64) {
    metrics::counter!(
        "redacta_requests_total",
        "flow" => flow.to_string(),
        "source" => source.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "redacta_request_duration_seconds",
        "flow" => flow.to_string()
    )
    .record(latency_sec);
}

/// Helper to track token usage.
pub fn track_tokens(model: &str, usage: &LlmUsage) {
    metrics::counter!("redacta_llm_tokens_total", "model" => model.to_string(), "type" => "prompt")
        .increment(usage.prompt_tokens);
    metrics::counter!("redacta_llm_tokens_total", "model" => model.to_string(), "type" => "completion")
        .increment(usage.completion_tokens);
}
