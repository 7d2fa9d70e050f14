//! Error types for the agent registry.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

use crate::agent::AgentKey;

/// Primary error type for all registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No agent registered under key {key}")]
    NotFound { key: AgentKey },

    #[error("Agent key space exhausted")]
    KeySpaceExhausted,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RegistryError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) | Self::Toml(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::KeySpaceExhausted | Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error names a key absent from the registry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error was raised by the completion service rather than
    /// by the registry itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
                | Self::Network(_)
                | Self::Serialization(_)
        )
    }

    /// Whether this error is potentially retryable.
    ///
    /// The registry never retries; this is a hint for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Network | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_key() {
        let err = RegistryError::NotFound { key: AgentKey(7) };
        assert_eq!(err.to_string(), "No agent registered under key 7");
        assert!(err.is_not_found());
        assert!(!err.is_upstream());
    }

    #[test]
    fn key_space_exhaustion_is_a_registry_error() {
        let err = RegistryError::KeySpaceExhausted;
        assert_eq!(err.to_string(), "Agent key space exhausted");
        assert!(!err.is_upstream());
        assert!(!err.is_retryable());
    }

    #[test]
    fn api_status_drives_category() {
        assert_eq!(
            RegistryError::api(503, "down").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            RegistryError::api(403, "nope").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            RegistryError::api(400, "bad").category(),
            ErrorCategory::Api
        );
    }
}
