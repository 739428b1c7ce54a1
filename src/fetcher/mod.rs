//! # Page Fetcher Module
//!
//! Retrieves a single page with one HTTP GET and parses it into a
//! [`ParsedDocument`]. There is no link-following, caching or retrying: a
//! failed fetch is reported to the caller and the action stops there.
//!
//! The response body is always treated as HTML, whatever content type the
//! server declares.

mod error;

pub use error::FetchError;

use reqwest::Client as ReqwestClient;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A fetched page, parsed into a queryable document tree
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    url: Url,
    html: Html,
}

impl ParsedDocument {
    /// Parse raw HTML that was retrieved from `url`
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(html),
        }
    }

    /// The URL the document was retrieved from, after redirects
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The underlying HTML tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// First element with the given tag name, in document order
    pub fn find_first(&self, tag: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(tag).ok()?;
        self.html.select(&selector).next()
    }

    /// All elements with the given tag name, in document order
    ///
    /// An invalid tag name matches nothing.
    pub fn find_all(&self, tag: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(tag) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                warn!("Failed to parse selector '{}': {}", tag, e);
                Vec::new()
            }
        }
    }
}

/// HTTP fetcher for single pages
#[derive(Clone, Default)]
pub struct Fetcher {
    client: ReqwestClient,
}

impl Fetcher {
    /// Create a fetcher with transport defaults (no custom headers or timeout)
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `url` and parse the body as HTML
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for any status outside 200-299 and
    /// [`FetchError::Http`] for network-level faults.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<ParsedDocument, FetchError> {
        info!("Fetching page");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            info!("Fetch failed with status {}", status);
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().await?;
        debug!("Received {} bytes from {}", bytes.len(), final_url);

        let body = String::from_utf8_lossy(&bytes);
        Ok(ParsedDocument::parse(final_url, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_success_parses_html() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("<html><body><h1>Hello</h1><p>One</p><p>Two</p></body></html>")
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let document = Fetcher::new().fetch(&url).await.unwrap();

        let heading = document.find_first("h1").unwrap();
        assert_eq!(heading.text().collect::<String>(), "Hello");
        assert_eq!(document.find_all("p").len(), 2);

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let result = Fetcher::new().fetch(&url).await;

        assert!(matches!(
            result,
            Err(FetchError::Status {
                status_code: 404,
                ..
            })
        ));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) on localhost is not expected to be listening
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let result = Fetcher::new().fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }

    #[test]
    fn test_find_all_invalid_tag_matches_nothing() {
        let url = Url::parse("https://example.com").unwrap();
        let document = ParsedDocument::parse(url, "<p>text</p>");
        assert!(document.find_all("<<").is_empty());
        assert!(document.find_first("<<").is_none());
    }
}
