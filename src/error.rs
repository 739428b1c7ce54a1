//! Error types for the content-brief crate

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::generation::GenerationError;
use crate::input::InputError;

/// Result type for content-brief operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for content-brief operations
#[derive(Debug, Error)]
pub enum Error {
    /// The user-supplied input was rejected before any network call
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// The page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A generation service call failed
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Terminal rendering error
    #[error("Render error: {0}")]
    Render(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ApiKey, validate_url};

    #[test]
    fn test_module_errors_convert() {
        let input: Error = validate_url("ftp://example.com").unwrap_err().into();
        assert!(matches!(input, Error::Input(InputError::UnsupportedScheme(_))));

        let key: Error = ApiKey::new("  ").unwrap_err().into();
        assert!(matches!(key, Error::Input(InputError::EmptyApiKey)));

        let render: Error = std::io::Error::other("closed pipe").into();
        assert!(matches!(render, Error::Render(_)));
        assert_eq!(render.to_string(), "Render error: closed pipe");
    }
}
