//! DOI resolution through content negotiation.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;

use crate::models::{CiteKey, CitePrefix, CslItem};
use crate::sources::{CitationSource, ResolveError};
use crate::utils::HttpClient;

/// Media type for CSL JSON content negotiation
pub(crate) const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

const DOI_BASE: &str = "https://doi.org";

const PREFIXES: &[CitePrefix] = &[CitePrefix::Doi];

/// DOI source
///
/// Asks the DOI resolver for CSL JSON; Crossref, DataCite and mEDRA all
/// answer this media type.
#[derive(Debug, Clone)]
pub struct DoiSource {
    client: HttpClient,
    base_url: String,
}

impl DoiSource {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DOI_BASE)
    }

    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the CSL item registered for a bare DOI such as `10.7554/elife.32822`
    pub async fn fetch_doi(&self, doi: &str) -> Result<CslItem, ResolveError> {
        let url = format!("{}/{}", self.base_url, doi);
        let mut item = fetch_csl_json(&self.client, &url, doi).await?;

        if item.url().is_none() {
            item.insert("URL", format!("{}/{}", DOI_BASE, doi));
        }

        Ok(item)
    }
}

#[async_trait]
impl CitationSource for DoiSource {
    fn id(&self) -> &str {
        "doi"
    }

    fn name(&self) -> &str {
        "DOI content negotiation"
    }

    fn prefixes(&self) -> &[CitePrefix] {
        PREFIXES
    }

    async fn fetch(&self, key: &CiteKey) -> Result<CslItem, ResolveError> {
        self.fetch_doi(&key.standard_accession()).await
    }
}

/// GET `url` asking for CSL JSON and check the item it returns.
pub(crate) async fn fetch_csl_json(
    client: &HttpClient,
    url: &str,
    identifier: &str,
) -> Result<CslItem, ResolveError> {
    let response = client
        .get(url)
        .header(ACCEPT, CSL_JSON)
        .send()
        .await
        .map_err(|e| ResolveError::Network(format!("Failed to fetch {}: {}", identifier, e)))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ResolveError::NotFound(identifier.to_string()));
    }
    if !status.is_success() {
        return Err(ResolveError::Api(format!(
            "{} returned status: {}",
            url, status
        )));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| ResolveError::Parse(format!("Failed to parse CSL JSON: {}", e)))?;

    Ok(CslItem::from_value(value)?)
}
