//! Core data models for catalog records, citation keys and CSL items.

mod catalog;
mod citekey;
mod csl;
mod enriched;

pub use catalog::{CatalogRecord, CitationField, ConsumedFields};
pub use citekey::{CiteKey, CiteKeyError, CitePrefix};
pub use csl::{CslError, CslItem, CONTRIBUTOR_ROLES};
pub use enriched::{
    EnrichedItem, EnrichedRecord, IdentityBlock, ItemMetadata, EXTRAS_KEY, IDENTITY_KEY,
};
