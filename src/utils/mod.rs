//! Utility modules supporting catalog enrichment.
//!
//! - [`HttpClient`]: Shared HTTP client with the crate's user agent and timeouts
//! - [`meta_content`] and friends: Lookups over HTML `<meta>` tags
//! - [`validate_doi`] and friends: Identifier validation used by citation keys
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use manubot_catalog::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.get("https://manubot.org").send().await?;
//! # Ok(())
//! # }
//! ```

mod html;
mod http;
mod validate;

pub use html::{document_title, meta_content, meta_contents, meta_tag};
pub use http::HttpClient;
pub use validate::{
    validate_arxiv_id, validate_doi, validate_http_url, validate_pmcid, validate_pmid,
    ValidationError,
};
