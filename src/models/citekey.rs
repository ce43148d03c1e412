//! Citation keys: `prefix:accession` identifiers such as `doi:10.7554/elife.32822`.

use std::fmt;
use thiserror::Error;

use crate::utils::{
    validate_arxiv_id, validate_doi, validate_http_url, validate_pmcid, validate_pmid,
};

/// The identifier scheme of a citation key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CitePrefix {
    Doi,
    Arxiv,
    Pmid,
    Pmcid,
    Url,
    Isbn,
    Wikidata,
    Other(String),
}

impl CitePrefix {
    /// Map a written prefix, including aliases, to its scheme.
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix.to_lowercase().as_str() {
            "doi" => CitePrefix::Doi,
            "arxiv" => CitePrefix::Arxiv,
            "pmid" => CitePrefix::Pmid,
            "pmc" | "pmcid" => CitePrefix::Pmcid,
            "url" | "http" | "https" => CitePrefix::Url,
            "isbn" => CitePrefix::Isbn,
            "wikidata" => CitePrefix::Wikidata,
            other => CitePrefix::Other(other.to_string()),
        }
    }

    /// Standard spelling used in normalized keys
    pub fn as_str(&self) -> &str {
        match self {
            CitePrefix::Doi => "doi",
            CitePrefix::Arxiv => "arxiv",
            CitePrefix::Pmid => "pmid",
            CitePrefix::Pmcid => "pmcid",
            CitePrefix::Url => "url",
            CitePrefix::Isbn => "isbn",
            CitePrefix::Wikidata => "wikidata",
            CitePrefix::Other(s) => s,
        }
    }

    /// Whether this crate can resolve keys with this prefix
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            CitePrefix::Doi
                | CitePrefix::Arxiv
                | CitePrefix::Pmid
                | CitePrefix::Pmcid
                | CitePrefix::Url
        )
    }
}

impl fmt::Display for CitePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed inspection of a citation key's accession
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{report}")]
pub struct CiteKeyError {
    pub report: String,
}

/// A parsed citation key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CiteKey {
    input: String,
    prefix: Option<CitePrefix>,
    accession: String,
}

impl CiteKey {
    /// Parse a citation string. Parsing never fails; use [`CiteKey::inspect`]
    /// to check the accession.
    ///
    /// Bare `http(s)://` URLs become `url` keys and bare `10.` DOIs or
    /// `PMC` identifiers get their prefix inferred.
    pub fn parse(input: &str) -> Self {
        let input = input.trim().to_string();

        let (prefix, accession) = match input.split_once(':') {
            Some((head, _)) if matches!(head.to_lowercase().as_str(), "http" | "https") => {
                (Some(CitePrefix::Url), input.clone())
            }
            Some((head, tail))
                if !head.is_empty()
                    && !head.starts_with("10.")
                    && !head.contains(char::is_whitespace) =>
            {
                (Some(CitePrefix::from_prefix(head)), tail.trim().to_string())
            }
            _ => (infer_prefix(&input), input.clone()),
        };

        Self {
            input,
            prefix,
            accession,
        }
    }

    /// The string this key was parsed from
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn prefix(&self) -> Option<&CitePrefix> {
        self.prefix.as_ref()
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Whether a resolver exists for this key's prefix
    pub fn is_handled_prefix(&self) -> bool {
        self.prefix.as_ref().is_some_and(CitePrefix::is_handled)
    }

    /// Check the accession against its prefix's format.
    pub fn inspect(&self) -> Result<(), CiteKeyError> {
        self.canonical_accession().map(|_| ())
    }

    /// The normalized `prefix:accession` form, e.g. `doi:10.7554/elife.32822`.
    ///
    /// Keys that fail inspection keep their accession as written.
    pub fn standard_id(&self) -> String {
        let accession = self.standard_accession();
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, accession),
            None => accession,
        }
    }

    /// The accession in canonical spelling, e.g. a lowercased DOI.
    pub fn standard_accession(&self) -> String {
        self.canonical_accession()
            .unwrap_or_else(|_| self.accession.clone())
    }

    fn canonical_accession(&self) -> Result<String, CiteKeyError> {
        let result = match &self.prefix {
            Some(CitePrefix::Doi) => validate_doi(&self.accession),
            Some(CitePrefix::Arxiv) => validate_arxiv_id(&self.accession),
            Some(CitePrefix::Pmid) => validate_pmid(&self.accession),
            Some(CitePrefix::Pmcid) => validate_pmcid(&self.accession),
            Some(CitePrefix::Url) => validate_http_url(&self.accession),
            Some(_) | None => {
                if self.accession.is_empty() {
                    return Err(CiteKeyError {
                        report: "citation key has an empty accession".to_string(),
                    });
                }
                return Ok(self.accession.clone());
            }
        };
        result.map_err(|e| CiteKeyError {
            report: e.to_string(),
        })
    }
}

impl fmt::Display for CiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

fn infer_prefix(accession: &str) -> Option<CitePrefix> {
    if accession.starts_with("10.") {
        return Some(CitePrefix::Doi);
    }
    let upper = accession.to_uppercase();
    if upper.len() > 3
        && upper.starts_with("PMC")
        && upper[3..].chars().all(|c| c.is_ascii_digit())
    {
        return Some(CitePrefix::Pmcid);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed() {
        let key = CiteKey::parse("doi:10.7554/eLife.32822");
        assert_eq!(key.prefix(), Some(&CitePrefix::Doi));
        assert_eq!(key.accession(), "10.7554/eLife.32822");
        assert_eq!(key.standard_id(), "doi:10.7554/elife.32822");

        let key = CiteKey::parse("PMC:pmc4497219");
        assert_eq!(key.prefix(), Some(&CitePrefix::Pmcid));
        assert_eq!(key.standard_id(), "pmcid:PMC4497219");
    }

    #[test]
    fn test_parse_url_forms() {
        let key = CiteKey::parse("url:https://greenelab.github.io/meta-review/");
        assert_eq!(key.prefix(), Some(&CitePrefix::Url));
        assert_eq!(key.accession(), "https://greenelab.github.io/meta-review/");
        assert_eq!(
            key.standard_id(),
            "url:https://greenelab.github.io/meta-review/"
        );

        let bare = CiteKey::parse("https://x.org/m");
        assert_eq!(bare.prefix(), Some(&CitePrefix::Url));
        assert_eq!(bare.standard_id(), "url:https://x.org/m");
    }

    #[test]
    fn test_infer_prefix() {
        assert_eq!(
            CiteKey::parse("10.1371/journal.pcbi.1007128").standard_id(),
            "doi:10.1371/journal.pcbi.1007128"
        );
        assert_eq!(CiteKey::parse("PMC4497219").standard_id(), "pmcid:PMC4497219");
        assert!(CiteKey::parse("just some words").prefix().is_none());
    }

    #[test]
    fn test_handled_prefixes() {
        assert!(CiteKey::parse("arxiv:1407.3561").is_handled_prefix());
        assert!(CiteKey::parse("pmid:29424689").is_handled_prefix());
        assert!(!CiteKey::parse("isbn:9780262517638").is_handled_prefix());
        assert!(!CiteKey::parse("wikidata:Q50051684").is_handled_prefix());
        assert!(!CiteKey::parse("tag:my-ref").is_handled_prefix());
        assert!(!CiteKey::parse("no prefix here").is_handled_prefix());
    }

    #[test]
    fn test_inspect_reports() {
        assert!(CiteKey::parse("doi:10.1/abc").inspect().is_ok());
        assert!(CiteKey::parse("arxiv:1407.3561v1").inspect().is_ok());

        let report = CiteKey::parse("doi:10.1234").inspect().unwrap_err();
        assert!(report.report.contains("slash"));

        let report = CiteKey::parse("pmid:PMC4497219").inspect().unwrap_err();
        assert!(report.report.contains("pmcid"));

        assert!(CiteKey::parse("url:not a url").inspect().is_err());
    }

    #[test]
    fn test_display_is_input() {
        let key = CiteKey::parse("  doi:10.1/ABC ");
        assert_eq!(key.to_string(), "doi:10.1/ABC");
    }
}
