//! Fixed instructions and prompt assembly for the generation calls
//!
//! Only headlines, body texts and CTAs are written into the article prompt.
//! Images and videos are part of the brief but never sent to the text model.

use std::fmt::Write as _;

use crate::extractor::{ContentBrief, Cta, Headline};
use crate::generation::types::{GenerationRequest, Message};

/// System instruction for the article call
pub const ARTICLE_SYSTEM_PROMPT: &str = "You are a content creator. Based on the following components, generate a coherent and engaging article. Use the headlines, body texts, CTAs, images, and videos appropriately.";

/// System instruction for the summary call
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a summarization assistant.";

/// Lead-in for the summary call's user message
pub const SUMMARY_USER_PREFIX: &str =
    "Summarize the following content and create a prompt for generating a relevant image: ";

/// Clause appended to every image prompt
pub const IMAGE_SAFETY_CLAUSE: &str = " The generated image must not contain any text.";

/// Build the two-message request for the article call
pub fn article_request(brief: &ContentBrief) -> GenerationRequest {
    GenerationRequest::new()
        .with_message(Message::system(ARTICLE_SYSTEM_PROMPT))
        .with_message(Message::user(describe_components(brief)))
}

/// Build the two-message request for the summary and image prompt call
pub fn summary_request(article: &str) -> GenerationRequest {
    GenerationRequest::new()
        .with_message(Message::system(SUMMARY_SYSTEM_PROMPT))
        .with_message(Message::user(format!("{}{}", SUMMARY_USER_PREFIX, article)))
}

/// The prompt sent to the image service
pub fn image_prompt(prompt: &str) -> String {
    format!("{}{}", prompt, IMAGE_SAFETY_CLAUSE)
}

/// Render the text components of a brief as the user message
pub fn describe_components(brief: &ContentBrief) -> String {
    let mut out = String::from("Here are the components:\n");

    section(&mut out, "Headlines", brief.headlines(), format_headline);
    section(&mut out, "Body Texts", brief.body_texts(), |text| text.clone());
    section(&mut out, "CTAs", brief.ctas(), format_cta);

    out
}

fn section<T>(out: &mut String, title: &str, items: &[T], render: impl Fn(&T) -> String) {
    let _ = writeln!(out, "{}:", title);
    if items.is_empty() {
        out.push_str("- (none)\n");
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {}", render(item));
    }
}

fn format_headline(headline: &Headline) -> String {
    format!("[{}] {}", headline.level, headline.text)
}

fn format_cta(cta: &Cta) -> String {
    match cta.href.as_deref() {
        Some(href) if !href.is_empty() => format!("{} ({})", cta.text, href),
        Some(_) => format!("{} (link)", cta.text),
        None => format!("{} (button)", cta.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{HeadingLevel, ImageAsset, VideoAsset};
    use crate::generation::types::Role;

    fn sample_brief() -> ContentBrief {
        ContentBrief::new(
            vec![Headline {
                level: HeadingLevel::H1,
                text: "Launch day".to_string(),
            }],
            vec!["We shipped it.".to_string()],
            vec![
                Cta {
                    text: "Try it".to_string(),
                    href: Some("/try".to_string()),
                },
                Cta {
                    text: "Contact".to_string(),
                    href: None,
                },
            ],
            vec![ImageAsset {
                src: "hero-image.png".to_string(),
                alt: "hero".to_string(),
                width: "auto".to_string(),
                height: "auto".to_string(),
            }],
            vec![VideoAsset {
                src: "promo-video.mp4".to_string(),
                width: "auto".to_string(),
                height: "auto".to_string(),
                format: "video/mp4".to_string(),
            }],
        )
    }

    #[test]
    fn test_article_request_shape() {
        let request = article_request(&sample_brief());
        let messages = request.messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, ARTICLE_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_components_exclude_images_and_videos() {
        let text = describe_components(&sample_brief());

        assert_eq!(
            text,
            "Here are the components:\n\
             Headlines:\n- [h1] Launch day\n\
             Body Texts:\n- We shipped it.\n\
             CTAs:\n- Try it (/try)\n- Contact (button)\n"
        );
        assert!(!text.contains("hero-image.png"));
        assert!(!text.contains("promo-video.mp4"));
    }

    #[test]
    fn test_empty_categories_are_marked() {
        let text = describe_components(&ContentBrief::default());
        assert_eq!(text.matches("- (none)").count(), 3);
    }

    #[test]
    fn test_summary_request_and_image_prompt() {
        let request = summary_request("An article.");
        assert_eq!(request.messages()[0].content, SUMMARY_SYSTEM_PROMPT);
        assert!(request.messages()[1].content.ends_with("image: An article."));

        assert_eq!(
            image_prompt("A lighthouse at dusk."),
            "A lighthouse at dusk. The generated image must not contain any text."
        );
    }
}
