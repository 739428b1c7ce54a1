//! Error types for the generation module

use thiserror::Error;

/// Error type for generation service calls
///
/// Callers treat every variant the same way: the action stops at the call
/// that failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The response parsed but carried no completion or image
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}
