//! Error types for the fetcher module

use thiserror::Error;

/// Error type for page fetches
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level fault (DNS, connection refused, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered outside the 2xx range
    #[error("{url} returned status {status_code}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// URL that was requested
        url: String,
    },
}
