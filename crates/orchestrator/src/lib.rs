//! Request orchestration for Redacta.
//!
//! Drives each request through cache, local rules and the LLM, and
//! absorbs every post-validation failure into a deterministic fallback.

pub mod builder;
pub mod orchestrator;
pub mod repair;
pub mod sanitize;

pub use builder::OrchestratorBuilder;
pub use orchestrator::{Orchestrator, Stage, SuggestionResult};
pub use repair::{reconcile, repair_and_parse, ParseError, RawCompetency, RawEvaluation};
pub use sanitize::sanitize;
