//! Lookups over HTML `<meta>` tags.

use scraper::{ElementRef, Html, Selector};

fn meta_elements(document: &Html) -> Vec<ElementRef<'_>> {
    match Selector::parse("meta") {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn matches_key(element: &ElementRef<'_>, key: &str) -> bool {
    ["name", "property"].iter().any(|attr| {
        element
            .value()
            .attr(attr)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(key))
    })
}

/// First `<meta>` tag whose `attr` attribute equals `value` exactly.
pub fn meta_tag<'a>(document: &'a Html, attr: &str, value: &str) -> Option<ElementRef<'a>> {
    meta_elements(document)
        .into_iter()
        .find(|element| element.value().attr(attr) == Some(value))
}

/// All non-empty `content` values of `<meta>` tags named `key`.
///
/// Both `name` and `property` attributes are matched, ignoring ASCII case,
/// so `citation_title`, `DC.title` and `og:title` all work.
pub fn meta_contents(document: &Html, key: &str) -> Vec<String> {
    meta_elements(document)
        .into_iter()
        .filter(|element| matches_key(element, key))
        .filter_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .collect()
}

/// First non-empty `content` value of a `<meta>` tag named `key`.
pub fn meta_content(document: &Html, key: &str) -> Option<String> {
    meta_contents(document, key).into_iter().next()
}

/// Text of the document `<title>`, whitespace-collapsed.
pub fn document_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
