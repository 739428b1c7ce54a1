//! # Structure Extraction Module
//!
//! Walks a [`ParsedDocument`] once and collects its structural content into a
//! [`ContentBrief`].
//!
//! ## Scope selection
//!
//! Extraction is limited to a single subtree, the scope root, chosen in fixed
//! priority order:
//!
//! 1. the first `<article>`
//! 2. the first `<main>`
//! 3. `<body>`
//! 4. the document root, if the parser produced no body
//!
//! ## Categories
//!
//! Within the scope root every category is a full scan in document order:
//! headlines (`h1`-`h6`), body texts (`p`), CTAs (`a` then `button`), images
//! (`img`) and videos (`video`). Empty elements still produce entries and
//! nested matches (a `button` inside an `a`) are recorded independently.
//! Missing attributes map to the sentinels in [`brief`].

pub mod brief;

pub use brief::{
    ContentBrief, Cta, DEFAULT_DIMENSION, DEFAULT_VIDEO_FORMAT, HeadingLevel, Headline,
    ImageAsset, VideoAsset,
};

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::{debug, instrument};

use crate::fetcher::ParsedDocument;

static ARTICLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article").expect("Failed to parse article selector - this is a bug")
});

static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("main").expect("Failed to parse main selector - this is a bug")
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("Failed to parse body selector - this is a bug")
});

// A single selector list keeps headings of mixed levels in document order.
static HEADLINE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6")
        .expect("Failed to parse headline selector - this is a bug")
});

static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector - this is a bug")
});

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("Failed to parse link selector - this is a bug")
});

static BUTTON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("button").expect("Failed to parse button selector - this is a bug")
});

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("Failed to parse image selector - this is a bug")
});

static VIDEO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("video").expect("Failed to parse video selector - this is a bug")
});

static SOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("source").expect("Failed to parse source selector - this is a bug")
});

/// Which element was chosen as the extraction boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Article,
    Main,
    Body,
    Document,
}

/// Pick the scope root: `article`, then `main`, then `body`, then the root element
pub fn select_scope(document: &ParsedDocument) -> (ScopeKind, ElementRef<'_>) {
    let html = document.html();
    let candidates = [
        (ScopeKind::Article, &*ARTICLE_SELECTOR),
        (ScopeKind::Main, &*MAIN_SELECTOR),
        (ScopeKind::Body, &*BODY_SELECTOR),
    ];

    candidates
        .into_iter()
        .find_map(|(kind, selector)| html.select(selector).next().map(|el| (kind, el)))
        .unwrap_or_else(|| (ScopeKind::Document, html.root_element()))
}

/// Extract the content brief from a parsed page
#[instrument(skip(document), fields(url = %document.url()))]
pub fn extract(document: &ParsedDocument) -> ContentBrief {
    let (scope_kind, scope) = select_scope(document);
    debug!("Extracting within {:?} scope", scope_kind);

    let headlines = extract_headlines(scope);
    let body_texts = scope.select(&PARAGRAPH_SELECTOR).map(element_text).collect();
    let ctas = extract_ctas(scope);
    let images = extract_images(scope);
    let videos = extract_videos(scope);

    let brief = ContentBrief::new(headlines, body_texts, ctas, images, videos);
    debug!(
        headlines = brief.headlines().len(),
        body_texts = brief.body_texts().len(),
        ctas = brief.ctas().len(),
        images = brief.images().len(),
        videos = brief.videos().len(),
        "Extraction finished"
    );
    brief
}

fn extract_headlines(scope: ElementRef<'_>) -> Vec<Headline> {
    scope
        .select(&HEADLINE_SELECTOR)
        .filter_map(|el| {
            HeadingLevel::from_tag(el.value().name()).map(|level| Headline {
                level,
                text: element_text(el),
            })
        })
        .collect()
}

fn extract_ctas(scope: ElementRef<'_>) -> Vec<Cta> {
    let links = scope.select(&LINK_SELECTOR).map(|el| Cta {
        text: element_text(el),
        href: Some(attr_or(el, "href", "")),
    });
    let buttons = scope.select(&BUTTON_SELECTOR).map(|el| Cta {
        text: element_text(el),
        href: None,
    });
    links.chain(buttons).collect()
}

fn extract_images(scope: ElementRef<'_>) -> Vec<ImageAsset> {
    scope
        .select(&IMAGE_SELECTOR)
        .map(|el| ImageAsset {
            src: attr_or(el, "src", ""),
            alt: attr_or(el, "alt", ""),
            width: attr_or(el, "width", DEFAULT_DIMENSION),
            height: attr_or(el, "height", DEFAULT_DIMENSION),
        })
        .collect()
}

fn extract_videos(scope: ElementRef<'_>) -> Vec<VideoAsset> {
    scope
        .select(&VIDEO_SELECTOR)
        .map(|el| {
            // <video> commonly declares its media through a child <source>
            let source = el.select(&SOURCE_SELECTOR).next();
            let from_source = |name: &str| source.and_then(|s| s.value().attr(name));

            VideoAsset {
                src: el
                    .value()
                    .attr("src")
                    .or_else(|| from_source("src"))
                    .unwrap_or_default()
                    .to_string(),
                width: attr_or(el, "width", DEFAULT_DIMENSION),
                height: attr_or(el, "height", DEFAULT_DIMENSION),
                format: el
                    .value()
                    .attr("type")
                    .or_else(|| from_source("type"))
                    .unwrap_or(DEFAULT_VIDEO_FORMAT)
                    .to_string(),
            }
        })
        .collect()
}

/// All descendant text, trimmed
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn attr_or(element: ElementRef<'_>, name: &str, default: &str) -> String {
    element.value().attr(name).unwrap_or(default).to_string()
}
