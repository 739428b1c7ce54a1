//! # content-brief - Generated Articles from Web Pages
//!
//! This crate fetches a single web page, extracts its structure into a
//! [`ContentBrief`](extractor::ContentBrief), and hands the brief to an
//! OpenAI-compatible API to write an article, a summary with an image prompt,
//! and finally an illustration.
//!
//! ## Features
//!
//! - Single-page fetch with explicit error reporting
//! - Structural extraction scoped to `<article>`, `<main>` or `<body>`
//! - Article, summary and image generation, each as one call
//! - An explicit action state machine that stops at the first failure
//! - Terminal rendering of generated Markdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use content_brief::fetcher::Fetcher;
//! use content_brief::generation::{GenerationClient, GenerationConfig};
//! use content_brief::input::ApiKey;
//! use content_brief::pipeline::ContentPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GenerationClient::new(GenerationConfig::default())?;
//!     let pipeline = ContentPipeline::new(Fetcher::new(), client);
//!     let key = ApiKey::new(std::env::var("OPENAI_API_KEY")?)?;
//!
//!     let outcome = pipeline
//!         .run("https://example.com/blog/post", &key, |_| true, |_| {})
//!         .await;
//!
//!     if let Some(article) = outcome.article {
//!         println!("{}", article);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod markdown;

pub mod extractor;
pub mod fetcher;
pub mod generation;
pub mod input;
pub mod pipeline;

pub use error::Error;
pub use markdown::{format_markdown, render_markdown};

/// Re-export of common types
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extractor::{ContentBrief, extract};
    pub use crate::fetcher::{Fetcher, ParsedDocument};
    pub use crate::generation::{ContentGenerator, GenerationClient, GenerationConfig};
    pub use crate::input::{ApiKey, validate_url};
    pub use crate::pipeline::{ActionOutcome, ActionState, ContentPipeline};
}
