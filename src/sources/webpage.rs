//! Web page resolution from embedded citation metadata.

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use scraper::Html;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::models::{CiteKey, CitePrefix, CslItem};
use crate::sources::{CitationSource, ResolveError};
use crate::utils::{document_title, meta_content, meta_contents, HttpClient};

const PREFIXES: &[CitePrefix] = &[CitePrefix::Url];

const TITLE_TAGS: &[&str] = &["citation_title", "dc.title", "og:title", "twitter:title"];
const AUTHOR_TAGS: &[&str] = &["citation_author", "dc.creator", "author"];
const CONTAINER_TAGS: &[&str] = &["citation_journal_title", "citation_conference_title", "og:site_name"];
const PUBLISHER_TAGS: &[&str] = &["citation_publisher", "dc.publisher"];
const DATE_TAGS: &[&str] = &[
    "citation_publication_date",
    "citation_date",
    "citation_online_date",
    "dc.date",
    "article:published_time",
];

/// URL source
///
/// Reads Highwire Press (`citation_*`), Dublin Core, OpenGraph and Twitter
/// card tags. Manubot manuscripts carry the Highwire set, so their pages
/// resolve to full items; other pages at least get a title.
#[derive(Debug, Clone)]
pub struct UrlSource {
    client: HttpClient,
}

impl UrlSource {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CitationSource for UrlSource {
    fn id(&self) -> &str {
        "url"
    }

    fn name(&self) -> &str {
        "Web page metadata"
    }

    fn prefixes(&self) -> &[CitePrefix] {
        PREFIXES
    }

    async fn fetch(&self, key: &CiteKey) -> Result<CslItem, ResolveError> {
        let url = key.standard_accession();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ResolveError::Api(format!("{} returned status: {}", url, status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ResolveError::Network(format!("Failed to read {}: {}", url, e)))?;

        let item = csl_from_html(&html, &url);
        item.check()?;
        if !item.contains_key("title") {
            return Err(ResolveError::Parse(format!("no title found on {}", url)));
        }
        Ok(item)
    }
}

/// Build a CSL item from a page's metadata tags.
pub fn csl_from_html(html: &str, url: &str) -> CslItem {
    let document = Html::parse_document(html);
    let first = |tags: &[&str]| tags.iter().find_map(|tag| meta_content(&document, tag));

    let container = first(CONTAINER_TAGS);
    let is_article = meta_content(&document, "citation_journal_title").is_some();

    let mut item = CslItem::new();
    item.insert("type", if is_article { "article-journal" } else { "webpage" });

    if let Some(title) = first(TITLE_TAGS).or_else(|| document_title(&document)) {
        item.insert("title", title);
    }
    if let Some(container) = container {
        item.insert("container-title", container);
    }
    if let Some(publisher) = first(PUBLISHER_TAGS) {
        item.insert("publisher", publisher);
    }

    let authors: Vec<Value> = AUTHOR_TAGS
        .iter()
        .map(|tag| meta_contents(&document, tag))
        .find(|names| !names.is_empty())
        .unwrap_or_default()
        .iter()
        .map(|name| parse_name(name))
        .collect();
    if !authors.is_empty() {
        item.insert("author", authors);
    }

    if let Some(date_parts) = first(DATE_TAGS).and_then(|date| parse_date_parts(&date)) {
        item.insert("issued", json!({ "date-parts": [date_parts] }));
    }
    if let Some(doi) = meta_content(&document, "citation_doi") {
        item.insert("DOI", doi);
    }

    item.insert("URL", url);
    item
}

/// `Family, Given` or `Given Family` as a CSL name; single words are literal.
fn parse_name(name: &str) -> Value {
    if let Some((family, given)) = name.split_once(',') {
        return json!({ "given": given.trim(), "family": family.trim() });
    }
    match name.trim().rsplit_once(char::is_whitespace) {
        Some((given, family)) => json!({ "given": given.trim(), "family": family }),
        None => json!({ "literal": name.trim() }),
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})(?:[-/](\d{1,2}))?(?:[-/](\d{1,2}))?")
            .expect("date pattern is valid")
    })
}

/// Leading `YYYY[-MM[-DD]]` of a date string as CSL date parts
fn parse_date_parts(date: &str) -> Option<Vec<u32>> {
    let captures = date_pattern().captures(date.trim())?;
    let parts: Vec<u32> = captures
        .iter()
        .skip(1)
        .map_while(|part| part.and_then(|m| m.as_str().parse().ok()))
        .collect();
    (!parts.is_empty()).then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use mockito::Server;

    const MANUSCRIPT: &str = r#"<html><head>
        <title>Open collaborative writing with Manubot</title>
        <meta name="citation_title" content="Open collaborative writing with Manubot">
        <meta name="citation_journal_title" content="Manubot">
        <meta name="citation_author" content="Daniel S. Himmelstein">
        <meta name="citation_author" content="Rando, Vincent">
        <meta name="citation_author" content="Consortium">
        <meta name="citation_publication_date" content="2019-05-01">
        <meta name="citation_doi" content="10.1371/journal.pcbi.1007128">
    </head></html>"#;

    #[test]
    fn test_csl_from_highwire_tags() {
        let item = csl_from_html(MANUSCRIPT, "https://greenelab.github.io/meta-review/");

        assert_eq!(item.get("type"), Some(&json!("article-journal")));
        assert_eq!(fields::title(&item).as_deref(), Some("Open collaborative writing with Manubot"));
        assert_eq!(fields::journal(&item).as_deref(), Some("Manubot"));
        assert_eq!(fields::authors_text(&item, 100), "Himmelstein, Rando, Consortium");
        assert_eq!(fields::date_iso(&item).as_deref(), Some("2019-05-01"));
        assert_eq!(item.url(), Some("https://greenelab.github.io/meta-review/"));
        assert!(item.check().is_ok());
    }

    #[test]
    fn test_csl_from_plain_page() {
        let item = csl_from_html("<title> Plain page </title>", "https://x.org/m");
        assert_eq!(item.get("type"), Some(&json!("webpage")));
        assert_eq!(item.get("title"), Some(&json!("Plain page")));
        assert!(!item.contains_key("author"));
        assert!(!item.contains_key("issued"));
    }

    #[test]
    fn test_parse_date_parts() {
        assert_eq!(parse_date_parts("2019"), Some(vec![2019]));
        assert_eq!(parse_date_parts("2019/05"), Some(vec![2019, 5]));
        assert_eq!(parse_date_parts("2019-05-01T12:00:00Z"), Some(vec![2019, 5, 1]));
        assert_eq!(parse_date_parts("May 2019"), None);
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/meta-review/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(MANUSCRIPT)
            .create_async()
            .await;

        let source = UrlSource::new(HttpClient::new().unwrap());
        let url = format!("{}/meta-review/", server.url());
        let item = source.fetch(&CiteKey::parse(&format!("url:{}", url))).await.unwrap();

        assert_eq!(item.url(), Some(url.as_str()));
        assert_eq!(item.get("DOI"), Some(&json!("10.1371/journal.pcbi.1007128")));
    }

    #[tokio::test]
    async fn test_fetch_page_without_title() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("<html><body></body></html>")
            .create_async()
            .await;

        let source = UrlSource::new(HttpClient::new().unwrap());
        let key = CiteKey::parse(&format!("url:{}/empty", server.url()));
        assert!(matches!(source.fetch(&key).await, Err(ResolveError::Parse(_))));
    }
}
