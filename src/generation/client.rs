//! Client for the text and image generation services

use tracing::{debug, info, instrument};

use crate::extractor::ContentBrief;
use crate::generation::config::GenerationConfig;
use crate::generation::error::GenerationError;
use crate::generation::http::HttpClient;
use crate::generation::prompts;
use crate::generation::types::{
    ChatCompletionRequest, ChatCompletionResponse, GenerationRequest, ImageGenerationRequest,
    ImageGenerationResponse,
};
use crate::generation::ContentGenerator;
use crate::input::ApiKey;

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const IMAGE_GENERATIONS_PATH: &str = "images/generations";

/// Client for the generation services
///
/// Holds no credentials: every call takes the [`ApiKey`] explicitly.
#[derive(Clone)]
pub struct GenerationClient {
    http_client: HttpClient,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Create a client with the given configuration
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let http_client = HttpClient::new(&config)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Write an article from the headlines, body texts and CTAs of a brief
    #[instrument(skip_all, level = "info")]
    pub async fn generate_article(
        &self,
        brief: &ContentBrief,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        info!("Generating article");
        let request = prompts::article_request(brief);
        self.complete(&request, self.config.article_max_tokens, credentials)
            .await
    }

    /// Summarize an article and derive an image prompt from it
    ///
    /// The service answers with a single string holding both parts.
    #[instrument(skip_all, level = "info", fields(article_len = article.len()))]
    pub async fn generate_summary_and_image_prompt(
        &self,
        article: &str,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        info!("Generating summary and image prompt");
        let request = prompts::summary_request(article);
        self.complete(&request, self.config.summary_max_tokens, credentials)
            .await
    }

    /// Generate one illustration and return its hosted URL
    #[instrument(skip_all, level = "info")]
    pub async fn generate_image(
        &self,
        image_prompt: &str,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        info!("Generating image");
        let prompt = prompts::image_prompt(image_prompt);
        let body = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt: &prompt,
            size: &self.config.image_size,
            quality: &self.config.image_quality,
            n: 1,
        };

        let response: ImageGenerationResponse = self
            .http_client
            .post(IMAGE_GENERATIONS_PATH, &body, credentials)
            .await?;

        response.first_url().map(str::to_string).ok_or_else(|| {
            GenerationError::EmptyResponse("image service returned no image URL".to_string())
        })
    }

    /// Run one chat completion and return the first choice's text
    async fn complete(
        &self,
        request: &GenerationRequest,
        max_tokens: u32,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.config.text_model,
            messages: request.messages(),
            temperature: self.config.temperature,
            max_tokens,
        };

        debug!(
            "Requesting completion from {} with {} messages",
            self.config.text_model,
            request.messages().len()
        );
        let response: ChatCompletionResponse = self
            .http_client
            .post(CHAT_COMPLETIONS_PATH, &body, credentials)
            .await?;

        response.first_text().map(str::to_string).ok_or_else(|| {
            GenerationError::EmptyResponse("text service returned no completion".to_string())
        })
    }
}

impl ContentGenerator for GenerationClient {
    async fn generate_article(
        &self,
        brief: &ContentBrief,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        GenerationClient::generate_article(self, brief, credentials).await
    }

    async fn generate_summary_and_image_prompt(
        &self,
        article: &str,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        GenerationClient::generate_summary_and_image_prompt(self, article, credentials).await
    }

    async fn generate_image(
        &self,
        image_prompt: &str,
        credentials: &ApiKey,
    ) -> Result<String, GenerationError> {
        GenerationClient::generate_image(self, image_prompt, credentials).await
    }
}
