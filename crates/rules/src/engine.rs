//! The local rule engine.

use redacta_core::{TransformationConfig, TransformationType};
use std::fmt;

use crate::handlers::{
    ConnectiveUpgrade, LocalHandler, Normalization, ParagraphRestructure, VocabularySubstitution,
};

/// A result produced without the LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResult {
    pub content: String,
    pub handler: &'static str,
    pub changes: usize,
}

/// Why the engine declined a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnhandledReason {
    /// No handler serves this transformation type.
    NotEligible(TransformationType),
    /// A handler exists but its condition does not hold.
    ConditionNotMet(String),
    /// The handler ran but found nothing to substitute.
    NoChanges,
}

impl fmt::Display for UnhandledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEligible(t) => write!(f, "no local handler for {}", t),
            Self::ConditionNotMet(reason) => f.write_str(reason),
            Self::NoChanges => f.write_str("no substitution applied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAttempt {
    Handled(LocalResult),
    Unhandled(UnhandledReason),
}

impl LocalAttempt {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    pub fn result(&self) -> Option<&LocalResult> {
        match self {
            Self::Handled(result) => Some(result),
            Self::Unhandled(_) => None,
        }
    }
}

/// Deterministic handlers that can satisfy simple requests without the LLM.
pub struct RuleEngine {
    handlers: Vec<Box<dyn LocalHandler>>,
}

impl RuleEngine {
    /// Engine with the standard handler set.
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(VocabularySubstitution),
                Box::new(ConnectiveUpgrade),
                Box::new(Normalization),
                Box::new(ParagraphRestructure),
            ],
        }
    }

    /// Engine with a custom handler set.
    pub fn with_handlers(handlers: Vec<Box<dyn LocalHandler>>) -> Self {
        Self { handlers }
    }

    pub fn attempt(&self, text: &str, config: &TransformationConfig) -> LocalAttempt {
        let transformation = config.transformation_type();

        let Some(handler) = self.handlers.iter().find(|h| h.serves() == transformation) else {
            return LocalAttempt::Unhandled(UnhandledReason::NotEligible(transformation));
        };

        if let Err(reason) = handler.check(text, config) {
            tracing::debug!(
                handler = handler.name(),
                reason = %reason,
                "Local handler declined"
            );
            return LocalAttempt::Unhandled(reason);
        }

        let rewrite = handler.apply(text, config);
        if rewrite.changes == 0 && !handler.always_succeeds() {
            return LocalAttempt::Unhandled(UnhandledReason::NoChanges);
        }

        tracing::debug!(
            handler = handler.name(),
            changes = rewrite.changes,
            "Local handler served request"
        );
        LocalAttempt::Handled(LocalResult {
            content: rewrite.content,
            handler: handler.name(),
            changes: rewrite.changes,
        })
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
