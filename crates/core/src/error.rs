//! Error types for Redacta.

use thiserror::Error;

/// Result type alias using Redacta's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Redacta.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Pipeline Errors
    // =========================================================================
    /// Empty or over-length input. The only class surfaced to pipeline callers.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No LLM client configured, or the call failed or timed out.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// LLM output could not be parsed or sanitized into the expected shape.
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    // =========================================================================
    // Ambient Errors
    // =========================================================================
    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an upstream unavailable error.
    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    /// Create a malformed upstream response error.
    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse(msg.into())
    }

    /// Create a template error.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Create a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error belongs to the class surfaced to callers.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short machine-readable code, used in HTTP error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::MalformedUpstreamResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_the_only_surfaced_class() {
        assert!(Error::validation("empty").is_validation());
        assert!(!Error::upstream_unavailable("timeout").is_validation());
        assert!(!Error::malformed_response("no json").is_validation());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::validation("x").code(), "VALIDATION_ERROR");
        assert_eq!(Error::internal("x").code(), "INTERNAL_ERROR");
        assert_eq!(
            Error::upstream_unavailable("x").to_string(),
            "Upstream unavailable: x"
        );
    }
}
