//! # Manubot Catalog
//!
//! Enriches a catalog of scholarly manuscripts with bibliographic metadata
//! (CSL JSON) and serializes the result as JSON.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (CatalogRecord, CiteKey, CslItem, EnrichedRecord)
//! - [`sources`]: Citation resolver plugins with a trait-based architecture
//! - [`fields`]: Display-ready values derived from a CSL item
//! - [`thumbnail`]: Thumbnail discovery from page `<meta>` tags
//! - [`enrich`]: Per-record enrichment and the per-run warning report
//! - [`catalog`]: Reading the YAML catalog and writing the JSON catalog
//! - [`pipeline`]: The load, enrich and write run
//! - [`utils`]: HTTP client, HTML helpers and identifier validation
//! - [`config`]: Configuration management

pub mod catalog;
pub mod config;
pub mod enrich;
pub mod fields;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod thumbnail;
pub mod utils;

// Re-export commonly used types
pub use enrich::{EnrichReport, Enricher};
pub use models::{CatalogRecord, CiteKey, CslItem, EnrichedRecord};
pub use sources::{Resolver, ResolverRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
