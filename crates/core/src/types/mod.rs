//! Core type definitions for Redacta.
//!
//! Broken down into submodules by pipeline concern.

pub mod cache;
pub mod conversation;
pub mod evaluation;
pub mod structure;
pub mod transformation;

pub use cache::*;
pub use conversation::*;
pub use evaluation::*;
pub use structure::*;
pub use transformation::*;
