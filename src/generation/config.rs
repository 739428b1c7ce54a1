//! # Generation Configuration Module
//!
//! Settings for the text and image generation calls. The defaults reproduce
//! the fixed request parameters the service is called with: `gpt-3.5-turbo`
//! at temperature 0.7 with 1000 tokens for the article and 300 for the
//! summary, and one `dall-e-2` image at 512x512, standard quality.
//!
//! Use [`GenerationConfig::builder`] to override individual values.

use std::time::Duration;

/// Default base URL of the OpenAI-compatible API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the generation client
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// Model used for the article and the summary
    pub text_model: String,

    /// Model used for the illustration
    pub image_model: String,

    /// Sampling temperature for text generation
    pub temperature: f64,

    /// Maximum output tokens for the article
    pub article_max_tokens: u32,

    /// Maximum output tokens for the summary and image prompt
    pub summary_max_tokens: u32,

    /// Requested image resolution
    pub image_size: String,

    /// Requested image quality tier
    pub image_quality: String,

    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "gpt-3.5-turbo".to_string(),
            image_model: "dall-e-2".to_string(),
            temperature: 0.7,
            article_max_tokens: 1000,
            summary_max_tokens: 300,
            image_size: "512x512".to_string(),
            image_quality: "standard".to_string(),
            timeout: None,
        }
    }
}

/// Builder for GenerationConfig
#[derive(Debug, Default)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
        }
    }

    /// Set the API base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the text generation model
    pub fn text_model(mut self, text_model: impl Into<String>) -> Self {
        self.config.text_model = text_model.into();
        self
    }

    /// Set the image generation model
    pub fn image_model(mut self, image_model: impl Into<String>) -> Self {
        self.config.image_model = image_model.into();
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the token limit for the article
    pub fn article_max_tokens(mut self, article_max_tokens: u32) -> Self {
        self.config.article_max_tokens = article_max_tokens;
        self
    }

    /// Set the token limit for the summary
    pub fn summary_max_tokens(mut self, summary_max_tokens: u32) -> Self {
        self.config.summary_max_tokens = summary_max_tokens;
        self
    }

    /// Set the image resolution, e.g. `512x512`
    pub fn image_size(mut self, image_size: impl Into<String>) -> Self {
        self.config.image_size = image_size.into();
        self
    }

    /// Set the image quality tier
    pub fn image_quality(mut self, image_quality: impl Into<String>) -> Self {
        self.config.image_quality = image_quality.into();
        self
    }

    /// Set a request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> GenerationConfig {
        self.config
    }
}

impl GenerationConfig {
    /// Create a new builder
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::new()
    }
}
