//! Thumbnail discovery from a page's OpenGraph and Twitter card tags.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::utils::{meta_tag, validate_http_url, HttpClient};

/// `<meta property=…>` values naming a thumbnail, in order of preference
pub const THUMBNAIL_PROPERTIES: &[&str] = &["og:image", "twitter:image"];

/// Finds a thumbnail image for a manuscript page.
///
/// Failures are not errors: a page without a usable thumbnail yields `None`.
#[async_trait]
pub trait ThumbnailSource: Send + Sync + std::fmt::Debug {
    async fn thumbnail_url(&self, page_url: &str) -> Option<String>;
}

/// Fetches the page over HTTP and reads its `<meta>` tags
#[derive(Debug, Clone)]
pub struct HtmlThumbnails {
    client: HttpClient,
}

impl HtmlThumbnails {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThumbnailSource for HtmlThumbnails {
    async fn thumbnail_url(&self, page_url: &str) -> Option<String> {
        if let Err(e) = validate_http_url(page_url) {
            tracing::debug!("Not fetching thumbnail for {}: {}", page_url, e);
            return None;
        }

        let response = match self.client.get(page_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Thumbnail request for {} failed: {}", page_url, e);
                return None;
            }
        };

        let final_url = response.url().clone();
        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Could not read {}: {}", final_url, e);
                return None;
            }
        };

        let thumbnail = extract_thumbnail(&html, &final_url);
        if thumbnail.is_none() {
            tracing::debug!("No thumbnail tag on {}", final_url);
        }
        thumbnail
    }
}

/// Thumbnail URL named by the first `og:image`, else `twitter:image`, tag,
/// resolved against `base_url` (the URL the page was finally served from).
pub fn extract_thumbnail(html: &str, base_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let tag = THUMBNAIL_PROPERTIES
        .iter()
        .find_map(|property| meta_tag(&document, "property", property))?;

    let content = tag.value().attr("content").unwrap_or_default().trim();
    base_url.join(content).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn base() -> Url {
        Url::parse("https://greenelab.github.io/meta-review/v/abc/").unwrap()
    }

    #[test]
    fn test_extract_prefers_og_image() {
        let html = r#"<html><head>
            <meta property="twitter:image" content="https://cdn.example.org/twitter.png">
            <meta property="og:image" content="images/thumbnail.png">
        </head></html>"#;
        assert_eq!(
            extract_thumbnail(html, &base()).as_deref(),
            Some("https://greenelab.github.io/meta-review/v/abc/images/thumbnail.png")
        );
    }

    #[test]
    fn test_extract_falls_back_to_twitter() {
        let html = r#"<meta property="twitter:image" content="/thumb.png">"#;
        assert_eq!(
            extract_thumbnail(html, &base()).as_deref(),
            Some("https://greenelab.github.io/thumb.png")
        );
    }

    #[test]
    fn test_extract_without_tag() {
        let html = r#"<meta name="og:image" content="/ignored.png"><title>x</title>"#;
        assert_eq!(extract_thumbnail(html, &base()), None);
    }

    #[test]
    fn test_extract_tag_without_content_gives_base() {
        let html = r#"<meta property="og:image">"#;
        assert_eq!(
            extract_thumbnail(html, &base()).as_deref(),
            Some("https://greenelab.github.io/meta-review/v/abc/")
        );
    }

    #[tokio::test]
    async fn test_fetch_resolves_against_response_url() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/manuscript/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<html><head><meta property="og:image" content="thumb.png"></head></html>"#)
            .create_async()
            .await;

        let thumbnails = HtmlThumbnails::new(HttpClient::new().unwrap());
        let url = format!("{}/manuscript/", server.url());
        let thumbnail = thumbnails.thumbnail_url(&url).await;

        assert_eq!(thumbnail, Some(format!("{}/manuscript/thumb.png", server.url())));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_none() {
        let thumbnails = HtmlThumbnails::new(HttpClient::new().unwrap());
        assert_eq!(thumbnails.thumbnail_url("not a url").await, None);
        assert_eq!(thumbnails.thumbnail_url("http://127.0.0.1:1/").await, None);
    }
}
