//! arXiv resolution through the DataCite DOIs arXiv registers for every preprint.

use async_trait::async_trait;

use crate::models::{CiteKey, CitePrefix, CslItem};
use crate::sources::{CitationSource, DoiSource, ResolveError};

/// DataCite prefix under which arXiv registers DOIs
const ARXIV_DOI_PREFIX: &str = "10.48550/arXiv.";

const PREFIXES: &[CitePrefix] = &[CitePrefix::Arxiv];

/// arXiv source
///
/// `arxiv:1407.3561v1` is looked up as DOI `10.48550/arXiv.1407.3561`;
/// the version suffix is dropped because DataCite registers one DOI per paper.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    doi: DoiSource,
}

impl ArxivSource {
    pub fn new(doi: DoiSource) -> Self {
        Self { doi }
    }

    /// DOI for an arXiv identifier, with any version suffix removed
    pub fn doi_for(id: &str) -> String {
        format!("{}{}", ARXIV_DOI_PREFIX, strip_version(id))
    }
}

fn strip_version(id: &str) -> &str {
    match id.rfind('v') {
        Some(pos)
            if pos + 1 < id.len() && id[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

#[async_trait]
impl CitationSource for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    fn prefixes(&self) -> &[CitePrefix] {
        PREFIXES
    }

    async fn fetch(&self, key: &CiteKey) -> Result<CslItem, ResolveError> {
        let id = key.standard_accession();
        let mut item = self.doi.fetch_doi(&Self::doi_for(&id)).await?;

        // The DOI fallback URL points at doi.org; prefer the abstract page.
        if item.url().map_or(true, |url| url.contains("doi.org/")) {
            item.insert("URL", format!("https://arxiv.org/abs/{}", id));
        }
        if !item.contains_key("number") {
            item.insert("number", id);
        }

        Ok(item)
    }
}
