#![deny(unused)]
//! Governance for Redacta.
//!
//! This crate provides:
//! - Structured logging setup
//! - Prometheus metrics for pipeline flows, token usage and cache events

pub mod metrics;
pub mod tracing_layer;

pub use metrics::{setup_metrics_recorder, track_request, track_tokens};
pub use tracing_layer::configure_tracing;
