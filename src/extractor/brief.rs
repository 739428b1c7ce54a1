//! Content brief data model

use std::fmt;

use serde::Serialize;

/// Sentinel used for image and video dimensions the page does not declare
pub const DEFAULT_DIMENSION: &str = "auto";

/// Sentinel used for videos that declare no MIME type
pub const DEFAULT_VIDEO_FORMAT: &str = "video/mp4";

/// Heading level of a headline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Map an HTML tag name to a heading level
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }

    /// The tag name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub level: HeadingLevel,
    pub text: String,
}

/// A call-to-action
///
/// Links always carry an `href` (empty when the attribute is missing);
/// buttons never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cta {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Cta {
    /// Whether this CTA came from a link rather than a button
    pub fn is_link(&self) -> bool {
        self.href.is_some()
    }
}

/// An `<img>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    pub src: String,
    pub alt: String,
    pub width: String,
    pub height: String,
}

/// A `<video>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAsset {
    pub src: String,
    pub width: String,
    pub height: String,
    pub format: String,
}

/// Structured content extracted from one page
///
/// Built once by [`extract`](crate::extractor::extract) and read-only
/// afterwards. Every sequence is in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentBrief {
    headlines: Vec<Headline>,
    body_texts: Vec<String>,
    ctas: Vec<Cta>,
    images: Vec<ImageAsset>,
    videos: Vec<VideoAsset>,
}

impl ContentBrief {
    pub(crate) fn new(
        headlines: Vec<Headline>,
        body_texts: Vec<String>,
        ctas: Vec<Cta>,
        images: Vec<ImageAsset>,
        videos: Vec<VideoAsset>,
    ) -> Self {
        Self {
            headlines,
            body_texts,
            ctas,
            images,
            videos,
        }
    }

    pub fn headlines(&self) -> &[Headline] {
        &self.headlines
    }

    pub fn body_texts(&self) -> &[String] {
        &self.body_texts
    }

    pub fn ctas(&self) -> &[Cta] {
        &self.ctas
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn videos(&self) -> &[VideoAsset] {
        &self.videos
    }

    /// True when no category produced any entry
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
            && self.body_texts.is_empty()
            && self.ctas.is_empty()
            && self.images.is_empty()
            && self.videos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_from_tag() {
        assert_eq!(HeadingLevel::from_tag("h3"), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_tag("H6"), Some(HeadingLevel::H6));
        assert_eq!(HeadingLevel::from_tag("p"), None);
        assert_eq!(HeadingLevel::H2.to_string(), "h2");
    }

    #[test]
    fn test_cta_serialization_omits_missing_href() {
        let button = Cta {
            text: "Subscribe".to_string(),
            href: None,
        };
        let link = Cta {
            text: "Go".to_string(),
            href: Some(String::new()),
        };

        assert_eq!(
            serde_json::to_value(&button).unwrap(),
            serde_json::json!({"text": "Subscribe"})
        );
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            serde_json::json!({"text": "Go", "href": ""})
        );
        assert!(link.is_link());
        assert!(!button.is_link());
    }
}
