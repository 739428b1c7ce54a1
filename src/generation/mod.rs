//! # Generation Module
//!
//! Turns a [`ContentBrief`] into generated content through an OpenAI-compatible
//! API. Three calls are available, each wrapping exactly one request:
//!
//! - [`GenerationClient::generate_article`]: article from the brief's text components
//! - [`GenerationClient::generate_summary_and_image_prompt`]: fused summary and image prompt
//! - [`GenerationClient::generate_image`]: hosted URL of one illustration
//!
//! Credentials are passed to every call; nothing is retried.

mod client;
mod config;
mod error;
mod http;
pub mod prompts;
mod types;

use std::future::Future;

pub use client::GenerationClient;
pub use config::{DEFAULT_BASE_URL, GenerationConfig, GenerationConfigBuilder};
pub use error::GenerationError;
pub use types::{GenerationRequest, Message, Role};

use crate::extractor::ContentBrief;
use crate::input::ApiKey;

/// The three generation steps of an action
///
/// Implemented by [`GenerationClient`]; the action pipeline is generic over
/// this trait so the call chain can be driven without a live service.
pub trait ContentGenerator {
    /// Write an article from a brief
    fn generate_article(
        &self,
        brief: &ContentBrief,
        credentials: &ApiKey,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;

    /// Summarize an article and derive an image prompt, as one string
    fn generate_summary_and_image_prompt(
        &self,
        article: &str,
        credentials: &ApiKey,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;

    /// Generate an image and return its hosted URL
    fn generate_image(
        &self,
        image_prompt: &str,
        credentials: &ApiKey,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
