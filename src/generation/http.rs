//! HTTP client for the generation services
//!
//! Sends JSON requests with bearer authentication and maps non-success
//! responses onto [`GenerationError`]. No retries are attempted.

use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::generation::config::GenerationConfig;
use crate::generation::error::GenerationError;
use crate::input::ApiKey;

/// HTTP client for an OpenAI-compatible API
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,
}

impl HttpClient {
    /// Create a client for the configured base URL
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the URL for an API path
    fn build_url(&self, path: &str) -> Result<Url, GenerationError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&url).map_err(|e| GenerationError::InvalidRequest(format!("Invalid URL: {}", e)))
    }

    /// Send a POST request with a JSON body
    #[instrument(skip(self, body, api_key), level = "debug")]
    pub async fn post<T, B>(&self, path: &str, body: &B, api_key: &ApiKey) -> Result<T, GenerationError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.build_url(path)?;
        let request = self
            .client
            .post(url)
            .bearer_auth(api_key.expose())
            .json(body);

        debug!("Sending POST request to {}", path);
        self.execute_request(request).await
    }

    /// Execute an HTTP request and handle the response
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GenerationError> {
        let response = request.send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                debug!("Failed to parse response: {}", e);
                GenerationError::UnexpectedResponse(format!("Failed to parse response: {}", e))
            })
        } else {
            debug!("API error: {} - {}", status, response_text);

            match status {
                StatusCode::UNAUTHORIZED => Err(GenerationError::Auth(
                    "Invalid API key or credentials".to_string(),
                )),
                StatusCode::TOO_MANY_REQUESTS => Err(GenerationError::RateLimit(response_text)),
                _ => Err(GenerationError::Api {
                    status_code: status.as_u16(),
                    message: response_text,
                }),
            }
        }
    }
}
