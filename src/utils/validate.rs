//! Validation for the identifiers that citation keys carry.
//!
//! Each validator returns the accession in its canonical spelling, or a
//! [`ValidationError`] whose message is suitable as an inspection report.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid DOI format: {0}")]
    InvalidDoi(String),

    #[error("Invalid arXiv identifier: {0}")]
    InvalidArxivId(String),

    #[error("Invalid PubMed identifier: {0}")]
    InvalidPmid(String),

    #[error("Invalid PubMed Central identifier: {0}")]
    InvalidPmcid(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

fn arxiv_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:\d{4}\.\d{4,5}|[a-z][a-z\-]*(?:\.[A-Z]{2})?/\d{7})(?:v\d+)?$",
        )
        .expect("arXiv pattern is valid")
    })
}

/// Validate and normalize a DOI
///
/// DOIs have the format "10.xxxx/xxxxxx" where xxxx is a registrant code
/// and xxxxxx is an item ID. The result is lowercased.
pub fn validate_doi(doi: &str) -> Result<String, ValidationError> {
    let doi = doi.trim().to_lowercase();

    if doi.is_empty() {
        return Err(ValidationError::InvalidDoi("empty DOI".to_string()));
    }

    // Remove any URL prefix if present first
    let doi = doi.strip_prefix("doi:").unwrap_or(&doi);
    let doi = doi.strip_prefix("https://doi.org/").unwrap_or(doi);
    let doi = doi.strip_prefix("http://doi.org/").unwrap_or(doi);

    if !doi.starts_with("10.") {
        return Err(ValidationError::InvalidDoi(
            "DOI must start with '10.'".to_string(),
        ));
    }

    let Some((_, suffix)) = doi.split_once('/') else {
        return Err(ValidationError::InvalidDoi(
            "DOI must contain a slash".to_string(),
        ));
    };

    if suffix.trim().is_empty() {
        return Err(ValidationError::InvalidDoi(
            "DOI must have a suffix after the slash".to_string(),
        ));
    }

    if doi.contains("..") {
        return Err(ValidationError::InvalidDoi(
            "path traversal detected".to_string(),
        ));
    }

    if doi.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidDoi(
            "DOI must not contain whitespace".to_string(),
        ));
    }

    Ok(doi.to_string())
}

/// Validate an arXiv identifier in new (`2301.12345v2`) or old
/// (`math.GT/0309136`) style.
pub fn validate_arxiv_id(id: &str) -> Result<String, ValidationError> {
    let id = id.trim();

    if arxiv_pattern().is_match(id) {
        Ok(id.to_string())
    } else {
        Err(ValidationError::InvalidArxivId(format!(
            "{id:?} matches neither the YYMM.NNNNN nor the archive/YYMMNNN form"
        )))
    }
}

/// Validate a PubMed identifier: 1-10 digits with no leading zero.
pub fn validate_pmid(pmid: &str) -> Result<String, ValidationError> {
    let pmid = pmid.trim();

    if pmid.to_uppercase().starts_with("PMC") {
        return Err(ValidationError::InvalidPmid(format!(
            "{pmid:?} is a PubMed Central identifier; use the pmcid prefix"
        )));
    }

    let digits_only = !pmid.is_empty() && pmid.chars().all(|c| c.is_ascii_digit());
    if !digits_only || pmid.starts_with('0') || pmid.len() > 10 {
        return Err(ValidationError::InvalidPmid(format!(
            "{pmid:?} should be 1-10 digits with no leading zeros"
        )));
    }

    Ok(pmid.to_string())
}

/// Validate a PubMed Central identifier such as `PMC4497219`. The result is
/// uppercased.
pub fn validate_pmcid(pmcid: &str) -> Result<String, ValidationError> {
    let pmcid = pmcid.trim().to_uppercase();

    match pmcid.strip_prefix("PMC") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Ok(pmcid)
        }
        _ => Err(ValidationError::InvalidPmcid(format!(
            "{pmcid:?} should be 'PMC' followed by digits"
        ))),
    }
}

/// Validate a URL for an HTTP(S) fetch.
pub fn validate_http_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ValidationError::InvalidUrl(format!(
                "invalid scheme: {scheme}"
            )))
        }
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_doi_valid() {
        assert!(validate_doi("10.1234/abc123").is_ok());
        assert!(validate_doi("10.1/abc").is_ok());
        assert_eq!(
            validate_doi("10.7554/eLife.32822").unwrap(),
            "10.7554/elife.32822"
        );
        assert_eq!(
            validate_doi("https://doi.org/10.1234/abc123").unwrap(),
            "10.1234/abc123"
        );
    }

    #[test]
    fn test_validate_doi_invalid() {
        assert!(validate_doi("").is_err());
        assert!(validate_doi("10.1234").is_err()); // No slash
        assert!(validate_doi("10.1234/").is_err()); // No suffix
        assert!(validate_doi("9.1234/abc").is_err()); // Doesn't start with 10
        assert!(validate_doi("10.1234/../abc").is_err());
        assert!(validate_doi("10.1234/a b").is_err());
    }

    #[test]
    fn test_validate_arxiv_id() {
        assert_eq!(validate_arxiv_id("2301.12345").unwrap(), "2301.12345");
        assert_eq!(validate_arxiv_id("1407.3561v1").unwrap(), "1407.3561v1");
        assert!(validate_arxiv_id("math.GT/0309136").is_ok());
        assert!(validate_arxiv_id("hep-th/9901001v2").is_ok());
        assert!(validate_arxiv_id("not-an-id").is_err());
        assert!(validate_arxiv_id("").is_err());
    }

    #[test]
    fn test_validate_pmid() {
        assert_eq!(validate_pmid("29424689").unwrap(), "29424689");
        assert!(validate_pmid("029424689").is_err());
        assert!(validate_pmid("12a").is_err());
        assert!(validate_pmid("").is_err());

        let err = validate_pmid("PMC4497219").unwrap_err();
        assert!(err.to_string().contains("pmcid"));
    }

    #[test]
    fn test_validate_pmcid() {
        assert_eq!(validate_pmcid("pmc4497219").unwrap(), "PMC4497219");
        assert!(validate_pmcid("4497219").is_err());
        assert!(validate_pmcid("PMC").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://greenelab.github.io/meta-review/").is_ok());
        assert!(validate_http_url("http://127.0.0.1:1234/page").is_ok());
        assert!(validate_http_url("").is_err());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("not a url").is_err());
    }
}
