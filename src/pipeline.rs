//! # Action Pipeline
//!
//! Runs one user action end to end:
//!
//! ```text
//! Idle -> Fetching -> Fetched -> AwaitingConfirmation -> GeneratingArticle
//!      -> ArticleReady -> GeneratingSummary -> SummaryReady
//!      -> GeneratingImage -> ImageReady
//! ```
//!
//! Each step is awaited before the next one starts. The first failure ends
//! the action in the matching failure state; results obtained before it (the
//! brief, the article, the summary) are kept in the [`ActionOutcome`]. There
//! is no resumption: retrying means running the whole action again.

use std::fmt;

use tracing::{info, instrument};
use url::Url;

use crate::error::Error;
use crate::extractor::{self, ContentBrief};
use crate::fetcher::{FetchError, Fetcher};
use crate::generation::ContentGenerator;
use crate::input::{ApiKey, validate_url};

/// State of a single action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Fetching,
    Fetched,
    AwaitingConfirmation,
    GeneratingArticle,
    ArticleReady,
    GeneratingSummary,
    SummaryReady,
    GeneratingImage,
    ImageReady,
    /// The user declined to continue after extraction
    Declined,
    InvalidInput,
    FetchFailed,
    ArticleFailed,
    SummaryFailed,
    ImageFailed,
}

impl ActionState {
    /// Whether the action ended on an error
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::FetchFailed
                | Self::ArticleFailed
                | Self::SummaryFailed
                | Self::ImageFailed
        )
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching page",
            Self::Fetched => "page fetched",
            Self::AwaitingConfirmation => "awaiting confirmation",
            Self::GeneratingArticle => "generating article",
            Self::ArticleReady => "article ready",
            Self::GeneratingSummary => "generating summary and image prompt",
            Self::SummaryReady => "summary ready",
            Self::GeneratingImage => "generating image",
            Self::ImageReady => "image ready",
            Self::Declined => "declined",
            Self::InvalidInput => "invalid input",
            Self::FetchFailed => "fetch failed",
            Self::ArticleFailed => "article generation failed",
            Self::SummaryFailed => "summary generation failed",
            Self::ImageFailed => "image generation failed",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything an action produced, up to its final state
#[derive(Debug)]
pub struct ActionOutcome {
    /// Final state
    pub state: ActionState,

    /// Every state entered, in order
    pub history: Vec<ActionState>,

    /// Extracted brief, when the fetch succeeded
    pub brief: Option<ContentBrief>,

    /// Generated article
    pub article: Option<String>,

    /// Fused summary and image prompt
    pub summary_and_prompt: Option<String>,

    /// Hosted URL of the generated image
    pub image_url: Option<String>,

    /// The error that ended the action, if any
    pub error: Option<Error>,
}

/// Tracks state transitions and partial results while an action runs
struct Progress<O> {
    observer: O,
    history: Vec<ActionState>,
    brief: Option<ContentBrief>,
    article: Option<String>,
    summary_and_prompt: Option<String>,
    image_url: Option<String>,
}

impl<O: FnMut(ActionState)> Progress<O> {
    fn new(observer: O) -> Self {
        Self {
            observer,
            history: Vec::new(),
            brief: None,
            article: None,
            summary_and_prompt: None,
            image_url: None,
        }
    }

    fn enter(&mut self, state: ActionState) {
        info!(%state, "Action state changed");
        self.history.push(state);
        (self.observer)(state);
    }

    fn finish(mut self, state: ActionState) -> ActionOutcome {
        self.enter(state);
        self.into_outcome(state, None)
    }

    fn fail(mut self, state: ActionState, err: impl Into<Error>) -> ActionOutcome {
        let err = err.into();
        info!(%state, "Action stopped: {}", err);
        self.enter(state);
        self.into_outcome(state, Some(err))
    }

    fn into_outcome(self, state: ActionState, error: Option<Error>) -> ActionOutcome {
        ActionOutcome {
            state,
            history: self.history,
            brief: self.brief,
            article: self.article,
            summary_and_prompt: self.summary_and_prompt,
            image_url: self.image_url,
            error,
        }
    }
}

/// Fetch, extract and generate for one URL at a time
pub struct ContentPipeline<G> {
    fetcher: Fetcher,
    generator: G,
    generate_image: bool,
}

impl<G: ContentGenerator> ContentPipeline<G> {
    /// Create a pipeline that runs all three generation steps
    pub fn new(fetcher: Fetcher, generator: G) -> Self {
        Self {
            fetcher,
            generator,
            generate_image: true,
        }
    }

    /// Enable or disable the summary and image steps
    ///
    /// When disabled, the action ends at [`ActionState::ArticleReady`].
    pub fn with_image_generation(mut self, enabled: bool) -> Self {
        self.generate_image = enabled;
        self
    }

    /// The generator used for the generation steps
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Fetch a page and extract its brief, without generating anything
    pub async fn fetch_brief(&self, url: &Url) -> Result<ContentBrief, FetchError> {
        let document = self.fetcher.fetch(url).await?;
        Ok(extractor::extract(&document))
    }

    /// Run a full action for `url`
    ///
    /// `confirm` is shown the extracted brief and decides whether generation
    /// starts. `observer` is told about every state change.
    #[instrument(skip(self, credentials, confirm, observer))]
    pub async fn run<C, O>(
        &self,
        url: &str,
        credentials: &ApiKey,
        confirm: C,
        observer: O,
    ) -> ActionOutcome
    where
        C: FnOnce(&ContentBrief) -> bool,
        O: FnMut(ActionState),
    {
        let mut progress = Progress::new(observer);
        progress.enter(ActionState::Idle);

        let url = match validate_url(url) {
            Ok(url) => url,
            Err(e) => return progress.fail(ActionState::InvalidInput, e),
        };

        progress.enter(ActionState::Fetching);
        let brief = match self.fetch_brief(&url).await {
            Ok(brief) => brief,
            Err(e) => return progress.fail(ActionState::FetchFailed, e),
        };
        progress.enter(ActionState::Fetched);

        progress.enter(ActionState::AwaitingConfirmation);
        let confirmed = confirm(&brief);
        let brief = progress.brief.insert(brief).clone();
        if !confirmed {
            return progress.finish(ActionState::Declined);
        }

        progress.enter(ActionState::GeneratingArticle);
        let article = match self.generator.generate_article(&brief, credentials).await {
            Ok(article) => article,
            Err(e) => return progress.fail(ActionState::ArticleFailed, e),
        };
        progress.article = Some(article.clone());

        if !self.generate_image {
            return progress.finish(ActionState::ArticleReady);
        }
        progress.enter(ActionState::ArticleReady);

        progress.enter(ActionState::GeneratingSummary);
        let summary_and_prompt = match self
            .generator
            .generate_summary_and_image_prompt(&article, credentials)
            .await
        {
            Ok(text) => text,
            Err(e) => return progress.fail(ActionState::SummaryFailed, e),
        };
        progress.summary_and_prompt = Some(summary_and_prompt.clone());
        progress.enter(ActionState::SummaryReady);

        progress.enter(ActionState::GeneratingImage);
        match self
            .generator
            .generate_image(&summary_and_prompt, credentials)
            .await
        {
            Ok(image_url) => {
                progress.image_url = Some(image_url);
                progress.finish(ActionState::ImageReady)
            }
            Err(e) => progress.fail(ActionState::ImageFailed, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;
    use mockito::{Mock, Server, ServerGuard};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing::{Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    const PAGE: &str = r#"<html><body>
        <nav><a href="/home">Home</a></nav>
        <article>
            <h1>Title</h1>
            <p>First paragraph.</p>
            <p>Second paragraph.</p>
            <a href="/go">Go</a>
            <img src="x.png">
        </article>
    </body></html>"#;

    #[derive(Default)]
    struct MockGenerator {
        fail_article: bool,
        fail_summary: bool,
        fail_image: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockGenerator {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn service_fault() -> GenerationError {
            GenerationError::Api {
                status_code: 500,
                message: "service unavailable".to_string(),
            }
        }
    }

    impl ContentGenerator for MockGenerator {
        async fn generate_article(
            &self,
            brief: &ContentBrief,
            _credentials: &ApiKey,
        ) -> Result<String, GenerationError> {
            self.record("article");
            if self.fail_article {
                return Err(Self::service_fault());
            }
            Ok(format!("Article about {}", brief.headlines()[0].text))
        }

        async fn generate_summary_and_image_prompt(
            &self,
            article: &str,
            _credentials: &ApiKey,
        ) -> Result<String, GenerationError> {
            self.record("summary");
            if self.fail_summary {
                return Err(Self::service_fault());
            }
            Ok(format!("Summary of '{}'. Prompt: a title card", article))
        }

        async fn generate_image(
            &self,
            _image_prompt: &str,
            _credentials: &ApiKey,
        ) -> Result<String, GenerationError> {
            self.record("image");
            if self.fail_image {
                return Err(Self::service_fault());
            }
            Ok("https://images.example.com/1.png".to_string())
        }
    }

    /// Counts events at WARN or above
    struct LoudEvents(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for LoudEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct PageServer {
        _server: ServerGuard,
        _page: Mock,
        url: String,
    }

    async fn page_server(status: usize) -> PageServer {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/page")
            .with_status(status)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;
        let url = format!("{}/page", server.url());
        PageServer {
            _server: server,
            _page: page,
            url,
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn test_full_action_reaches_image_ready() {
        let page = page_server(200).await;
        let pipeline = ContentPipeline::new(Fetcher::new(), MockGenerator::default());

        let mut observed = Vec::new();
        let outcome = pipeline
            .run(&page.url, &key(), |_| true, |state| observed.push(state))
            .await;

        assert_eq!(outcome.state, ActionState::ImageReady);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.article.as_deref(), Some("Article about Title"));
        assert!(outcome.summary_and_prompt.is_some());
        assert_eq!(
            outcome.image_url.as_deref(),
            Some("https://images.example.com/1.png")
        );
        assert_eq!(
            outcome.history,
            vec![
                ActionState::Idle,
                ActionState::Fetching,
                ActionState::Fetched,
                ActionState::AwaitingConfirmation,
                ActionState::GeneratingArticle,
                ActionState::ArticleReady,
                ActionState::GeneratingSummary,
                ActionState::SummaryReady,
                ActionState::GeneratingImage,
                ActionState::ImageReady,
            ]
        );
        assert_eq!(observed, outcome.history);
        assert_eq!(pipeline.generator().calls(), vec!["article", "summary", "image"]);
    }

    #[tokio::test]
    async fn test_article_failure_stops_the_chain() {
        let page = page_server(200).await;
        let generator = MockGenerator {
            fail_article: true,
            ..Default::default()
        };
        let pipeline = ContentPipeline::new(Fetcher::new(), generator);

        let outcome = pipeline.run(&page.url, &key(), |_| true, |_| {}).await;

        assert_eq!(outcome.state, ActionState::ArticleFailed);
        assert!(outcome.state.is_failure());
        assert!(matches!(outcome.error, Some(Error::Generation(_))));
        assert!(outcome.brief.is_some());
        assert!(outcome.article.is_none());
        assert_eq!(pipeline.generator().calls(), vec!["article"]);
    }

    #[tokio::test]
    async fn test_summary_failure_keeps_article() {
        let page = page_server(200).await;
        let generator = MockGenerator {
            fail_summary: true,
            ..Default::default()
        };
        let pipeline = ContentPipeline::new(Fetcher::new(), generator);

        let outcome = pipeline.run(&page.url, &key(), |_| true, |_| {}).await;

        assert_eq!(outcome.state, ActionState::SummaryFailed);
        assert_eq!(outcome.article.as_deref(), Some("Article about Title"));
        assert!(outcome.image_url.is_none());
        assert_eq!(pipeline.generator().calls(), vec!["article", "summary"]);
    }

    #[tokio::test]
    async fn test_image_failure_keeps_text_results() {
        let page = page_server(200).await;
        let generator = MockGenerator {
            fail_image: true,
            ..Default::default()
        };
        let pipeline = ContentPipeline::new(Fetcher::new(), generator);

        let outcome = pipeline.run(&page.url, &key(), |_| true, |_| {}).await;

        assert_eq!(outcome.state, ActionState::ImageFailed);
        assert!(outcome.article.is_some());
        assert!(outcome.summary_and_prompt.is_some());
        assert!(outcome.image_url.is_none());
        assert_eq!(pipeline.generator().calls(), vec!["article", "summary", "image"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_extraction_and_generation() {
        let page = page_server(404).await;
        let pipeline = ContentPipeline::new(Fetcher::new(), MockGenerator::default());

        let mut confirm_called = false;
        let outcome = pipeline
            .run(
                &page.url,
                &key(),
                |_| {
                    confirm_called = true;
                    true
                },
                |_| {},
            )
            .await;

        assert_eq!(outcome.state, ActionState::FetchFailed);
        assert!(matches!(
            outcome.error,
            Some(Error::Fetch(FetchError::Status {
                status_code: 404,
                ..
            }))
        ));
        assert!(outcome.brief.is_none());
        assert!(!confirm_called);
        assert!(pipeline.generator().calls().is_empty());
    }

    #[tokio::test]
    async fn test_declined_confirmation_generates_nothing() {
        let page = page_server(200).await;
        let pipeline = ContentPipeline::new(Fetcher::new(), MockGenerator::default());

        let outcome = pipeline
            .run(
                &page.url,
                &key(),
                |brief| {
                    assert_eq!(brief.body_texts().len(), 2);
                    assert_eq!(brief.ctas().len(), 1);
                    false
                },
                |_| {},
            )
            .await;

        assert_eq!(outcome.state, ActionState::Declined);
        assert!(!outcome.state.is_failure());
        assert!(outcome.error.is_none());
        assert!(outcome.brief.is_some());
        assert!(pipeline.generator().calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_fetching() {
        let pipeline = ContentPipeline::new(Fetcher::new(), MockGenerator::default());

        let outcome = pipeline.run("not a url", &key(), |_| true, |_| {}).await;

        assert_eq!(outcome.state, ActionState::InvalidInput);
        assert!(matches!(outcome.error, Some(Error::Input(_))));
        assert_eq!(
            outcome.history,
            vec![ActionState::Idle, ActionState::InvalidInput]
        );
    }

    #[tokio::test]
    async fn test_image_generation_disabled_stops_after_article() {
        let page = page_server(200).await;
        let pipeline = ContentPipeline::new(Fetcher::new(), MockGenerator::default())
            .with_image_generation(false);

        let outcome = pipeline.run(&page.url, &key(), |_| true, |_| {}).await;

        assert_eq!(outcome.state, ActionState::ArticleReady);
        assert!(outcome.error.is_none());
        assert_eq!(pipeline.generator().calls(), vec!["article"]);
    }

    #[tokio::test]
    async fn test_handled_failures_stay_below_warn() {
        let loud = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(LoudEvents(loud.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let page = page_server(200).await;
        let generator = MockGenerator {
            fail_article: true,
            ..Default::default()
        };
        let pipeline = ContentPipeline::new(Fetcher::new(), generator);

        let failed = pipeline.run(&page.url, &key(), |_| true, |_| {}).await;
        let rejected = pipeline.run("not a url", &key(), |_| true, |_| {}).await;

        assert_eq!(failed.state, ActionState::ArticleFailed);
        assert_eq!(rejected.state, ActionState::InvalidInput);
        assert_eq!(loud.load(Ordering::SeqCst), 0);
    }
}
