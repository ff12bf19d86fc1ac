//! Context compression for Redacta.
//!
//! Shrinks conversation history and argument outlines before they are
//! spliced into a prompt. Every output respects an approximate token
//! budget (see `redacta_core::tokens`).

pub mod compressor;
pub mod keywords;
pub mod summary;

pub use compressor::ContextCompressor;
pub use keywords::FrequencyKeywordExtractor;
