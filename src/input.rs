//! User-supplied inputs: the page URL and the API credential
//!
//! Both are validated or wrapped here before they are handed to the fetcher
//! and the generation client, so the rest of the crate only ever sees a parsed
//! absolute [`Url`] and an [`ApiKey`].

use std::fmt;

use thiserror::Error;
use url::Url;

/// Error raised when user input is rejected
#[derive(Debug, Error)]
pub enum InputError {
    /// The string could not be parsed as a URL
    #[error("'{input}' is not a valid URL: {source}")]
    Malformed {
        /// The rejected input
        input: String,
        /// Underlying parse error
        source: url::ParseError,
    },

    /// The URL uses a scheme other than http or https
    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// The URL has no host component
    #[error("URL '{0}' has no host")]
    MissingHost(String),

    /// The API key is empty
    #[error("API key must not be empty")]
    EmptyApiKey,
}

/// Validate that `input` is an absolute http(s) URL with a host
pub fn validate_url(input: &str) -> Result<Url, InputError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|source| InputError::Malformed {
        input: trimmed.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(InputError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(InputError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

/// Credential for the generation services
///
/// The key is only ever used as a bearer token; it is never validated beyond
/// being non-empty and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw API key
    pub fn new(key: impl Into<String>) -> Result<Self, InputError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(InputError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    /// The raw key, for use in an outbound authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
