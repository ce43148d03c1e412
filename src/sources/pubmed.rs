//! PubMed and PubMed Central resolution through the NCBI citation exporter.

use async_trait::async_trait;

use crate::models::{CiteKey, CitePrefix, CslItem};
use crate::sources::doi::fetch_csl_json;
use crate::sources::{CitationSource, ResolveError};
use crate::utils::HttpClient;

const NCBI_API_BASE: &str = "https://api.ncbi.nlm.nih.gov";

const PREFIXES: &[CitePrefix] = &[CitePrefix::Pmid, CitePrefix::Pmcid];

/// PubMed / PMC source
///
/// Uses the Literature Citation Exporter (`/lit/ctxp/v1/{pubmed,pmc}/`),
/// which renders CSL JSON directly.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: HttpClient,
    base_url: String,
}

impl PubMedSource {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NCBI_API_BASE)
    }

    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn exporter_url(&self, database: &str, id: &str) -> String {
        format!(
            "{}/lit/ctxp/v1/{}/?format=csl&id={}",
            self.base_url, database, id
        )
    }
}

#[async_trait]
impl CitationSource for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    fn prefixes(&self) -> &[CitePrefix] {
        PREFIXES
    }

    async fn fetch(&self, key: &CiteKey) -> Result<CslItem, ResolveError> {
        let id = key.standard_accession();
        let (database, landing_page) = match key.prefix() {
            Some(CitePrefix::Pmid) => ("pubmed", format!("https://www.ncbi.nlm.nih.gov/pubmed/{}", id)),
            Some(CitePrefix::Pmcid) => (
                "pmc",
                format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{}/", id),
            ),
            _ => return Err(ResolveError::Unsupported(key.to_string())),
        };

        let url = self.exporter_url(database, &id);
        let mut item = fetch_csl_json(&self.client, &url, &id).await?;

        if item.url().is_none() {
            item.insert("URL", landing_page);
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_fetch_pmid() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/lit/ctxp/v1/pubmed/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "csl".into()),
                Matcher::UrlEncoded("id".into(), "29424689".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "type": "article-journal",
                    "title": "Sci-Hub provides access to nearly all scholarly literature",
                    "container-title": "eLife",
                    "PMID": "29424689",
                    "issued": {"date-parts": [[2018, 3, 1]]}
                }"#,
            )
            .create_async()
            .await;

        let source = PubMedSource::with_base_url(HttpClient::new().unwrap(), &server.url());
        let item = source.fetch(&CiteKey::parse("pmid:29424689")).await.unwrap();

        assert_eq!(item.get("container-title").and_then(|v| v.as_str()), Some("eLife"));
        assert_eq!(item.url(), Some("https://www.ncbi.nlm.nih.gov/pubmed/29424689"));
    }

    #[tokio::test]
    async fn test_fetch_pmcid_uses_pmc_database() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/lit/ctxp/v1/pmc/")
            .match_query(Matcher::UrlEncoded("id".into(), "PMC4497219".into()))
            .with_status(200)
            .with_body(r#"{"title": "Heterogeneous network edge prediction", "URL": "https://example.org/a"}"#)
            .create_async()
            .await;

        let source = PubMedSource::with_base_url(HttpClient::new().unwrap(), &server.url());
        let item = source.fetch(&CiteKey::parse("pmcid:pmc4497219")).await.unwrap();

        assert_eq!(item.url(), Some("https://example.org/a"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let source = PubMedSource::with_base_url(HttpClient::new().unwrap(), &server.url());
        let err = source.fetch(&CiteKey::parse("pmid:1")).await.unwrap_err();
        assert!(matches!(err, ResolveError::Api(_)));
    }
}
