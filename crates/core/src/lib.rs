//! Core types, traits, and error definitions for Redacta.
//!
//! This crate provides the foundational building blocks shared by every
//! stage of the request-optimization pipeline: the transformation model,
//! the LLM client contract, configuration, and token estimation.

pub mod config;
pub mod connectives;
pub mod error;
pub mod mocks;
pub mod text;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
