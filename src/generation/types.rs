//! Request and response types for the generation services

use serde::{Deserialize, Serialize};

/// Role of a message in a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who is speaking
    pub role: Role,

    /// Text content
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered messages for one text generation call
///
/// Built with [`GenerationRequest::with_message`] and not modified once it
/// is handed to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    messages: Vec<Message>,
}

impl GenerationRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// The messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Body of a chat completion call
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Response of a chat completion call
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Message returned inside a choice
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// Body of an image generation call
#[derive(Debug, Serialize)]
pub(crate) struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
    pub quality: &'a str,
    pub n: u32,
}

/// Response of an image generation call
#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

/// One generated image
#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageGenerationResponse {
    /// Hosted URL of the first image, if any
    pub fn first_url(&self) -> Option<&str> {
        self.data.first().and_then(|image| image.url.as_deref())
    }
}
