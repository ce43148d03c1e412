//! Citation resolver plugins with a trait-based architecture.
//!
//! The enricher sees a single [`Resolver`]: validate a citation string,
//! normalize it, and resolve it to a [`CslItem`]. [`ResolverRegistry`]
//! implements it by dispatching each citation key to the
//! [`CitationSource`] registered for its prefix:
//!
//! | Prefix | Source | Service |
//! |---|---|---|
//! | `doi` | [`DoiSource`] | DOI content negotiation (`application/vnd.citationstyles.csl+json`) |
//! | `arxiv` | [`ArxivSource`] | DataCite DOI `10.48550/arXiv.<id>` via content negotiation |
//! | `pmid`, `pmcid` | [`PubMedSource`] | NCBI literature citation exporter |
//! | `url` | [`UrlSource`] | Highwire, Dublin Core and OpenGraph tags of the page |
//!
//! Other prefixes (`isbn`, `wikidata`, …) parse but are rejected as unhandled.
//! Tests substitute [`MockResolver`].

mod arxiv;
mod doi;
mod pubmed;
mod registry;
mod webpage;

pub mod mock;

pub use arxiv::ArxivSource;
pub use doi::DoiSource;
pub use mock::MockResolver;
pub use pubmed::PubMedSource;
pub use registry::ResolverRegistry;
pub use webpage::UrlSource;

use async_trait::async_trait;

use crate::models::{CiteKey, CitePrefix, CslError, CslItem};

/// The citation-resolution boundary used by the enricher.
///
/// `validate` and `normalize` default to the [`CiteKey`] rules; only
/// `resolve` touches the network.
#[async_trait]
pub trait Resolver: Send + Sync + std::fmt::Debug {
    /// Check that a citation uses a handled prefix and a well-formed accession
    fn validate(&self, citation: &str) -> Result<(), CitationRejected> {
        let key = CiteKey::parse(citation);
        if !key.is_handled_prefix() {
            return Err(CitationRejected::Unhandled(citation.to_string()));
        }
        key.inspect()
            .map_err(|e| CitationRejected::FailedInspection {
                citation: citation.to_string(),
                report: e.report,
            })
    }

    /// Standard `prefix:accession` form of a citation
    fn normalize(&self, citation: &str) -> String {
        CiteKey::parse(citation).standard_id()
    }

    /// Fetch the CSL item for a (normalized) citation
    async fn resolve(&self, citation: &str) -> Result<CslItem, ResolveError>;
}

/// A metadata service able to resolve keys with certain prefixes.
#[async_trait]
pub trait CitationSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Citation key prefixes this source resolves
    fn prefixes(&self) -> &[CitePrefix];

    fn handles(&self, prefix: &CitePrefix) -> bool {
        self.prefixes().contains(prefix)
    }

    /// Fetch the CSL item for a key with one of this source's prefixes
    async fn fetch(&self, key: &CiteKey) -> Result<CslItem, ResolveError>;
}

/// Why a citation was not looked up at all
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CitationRejected {
    /// The prefix is unknown or has no resolver
    #[error("unhandled citekey: {0:?}")]
    Unhandled(String),

    /// The accession is malformed for its prefix
    #[error("citekey failed inspection: {citation:?}\n{report}")]
    FailedInspection { citation: String, report: String },
}

/// Errors that can occur when resolving a citation
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No registered source handles the citation's prefix
    #[error("No source handles citation: {0}")]
    Unsupported(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response from the service
    #[error("API error: {0}")]
    Api(String),

    /// The service does not know the identifier
    #[error("Citation not found: {0}")]
    NotFound(String),

    /// Parsing error (JSON, HTML, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response is not a usable CSL item
    #[error("Invalid CSL item: {0}")]
    InvalidItem(#[from] CslError),
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::Parse(format!("JSON: {}", err))
    }
}
