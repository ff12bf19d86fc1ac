//! Deterministic rule engine for Redacta.
//!
//! - `engine`: the local handlers that can serve a request without the LLM
//! - `fallback`: the permissive generator used when the LLM path fails
//! - `evaluation`: heuristic five-competency essay scoring
//! - `suggestions`: vocabulary suggestion lists

pub mod engine;
pub mod evaluation;
pub mod fallback;
pub mod handlers;
pub mod normalize;
pub mod suggestions;
pub mod table;
pub mod vocabulary;

pub use engine::{LocalAttempt, LocalResult, RuleEngine, UnhandledReason};
pub use fallback::FallbackGenerator;
pub use handlers::LocalHandler;
pub use suggestions::suggestions;
