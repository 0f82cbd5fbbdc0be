use thiserror::Error;

/// Application-wide error types for Summer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request failed validation before any provider call was attempted.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Required credentials or provider configuration are missing.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed (fetching a page or calling an API).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// An LLM provider returned a non-success status or an unusable body.
    #[error("{provider} error (HTTP {status_code}): {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
        status_code: u16,
    },

    /// The completion was empty or too short after output cleaning.
    #[error("Generated summary is too short or empty after cleaning")]
    EmptySummary,

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if the error was raised before any outbound call.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_) | AppError::ConfigError(_)
        )
    }
}
