#![deny(unused)]
//! HTTP gateway for Redacta.
//!
//! Exposes the transformation, evaluation and suggestion flows plus cache
//! administration as a JSON API.

pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, GatewayConfig, GatewayServer};
