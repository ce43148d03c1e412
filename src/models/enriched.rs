//! Output records of the enrichment pass.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::CslItem;

/// Output key of the identity block
pub const IDENTITY_KEY: &str = "manubot";

/// Output key of the unconsumed input fields
pub const EXTRAS_KEY: &str = "extras";

/// Display-ready values derived from a resolved CSL item
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ItemMetadata {
    pub title: Option<String>,
    pub authors: String,
    pub journal: Option<String>,
    pub date_iso: Option<String>,
    pub date_human: Option<String>,
    pub csl_item: CslItem,
}

/// A resolved publication-type entry, e.g. the journal version of a manuscript
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EnrichedItem {
    /// Standard citation key the item was resolved from
    pub citation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub metadata: ItemMetadata,
}

/// The manuscript itself: where it lives and, when resolvable, its metadata
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct IdentityBlock {
    pub repo_url: Option<String>,
    pub url: Option<String>,
    pub citation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(flatten)]
    pub metadata: Option<ItemMetadata>,
}

/// One enriched catalog entry.
///
/// Serializes as `{"manubot": …, "<type>": …, "extras": …}` with publication
/// types in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedRecord {
    pub identity: IdentityBlock,
    pub publications: Vec<(String, EnrichedItem)>,
    pub extras: Map<String, Value>,
}

impl EnrichedRecord {
    /// The block for a publication type, if it resolved
    pub fn publication(&self, publication_type: &str) -> Option<&EnrichedItem> {
        self.publications
            .iter()
            .find(|(name, _)| name == publication_type)
            .map(|(_, item)| item)
    }

    pub fn has_thumbnail(&self) -> bool {
        self.identity.thumbnail_url.is_some()
    }
}

impl Serialize for EnrichedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.publications.len() + 2))?;
        map.serialize_entry(IDENTITY_KEY, &self.identity)?;
        for (publication_type, item) in &self.publications {
            map.serialize_entry(publication_type, item)?;
        }
        map.serialize_entry(EXTRAS_KEY, &self.extras)?;
        map.end()
    }
}
