//! Input catalog records and their partition into consumed fields and extras.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SchemaConfig;

/// One entry of the input catalog: string keys to arbitrary YAML values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(Map<String, Value>);

/// A publication-type citation field taken out of a record
#[derive(Debug, Clone, PartialEq)]
pub struct CitationField {
    /// Publication type, e.g. `journal`
    pub publication_type: String,
    /// The raw field value; not necessarily a string
    pub value: Value,
}

/// The fields of a record that enrichment promotes into typed blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumedFields {
    pub manuscript_url: Option<String>,
    pub repository_url: Option<String>,
    /// `None` when the record has no thumbnail field; `Some(None)` when the
    /// field is present but empty, which suppresses thumbnail discovery.
    pub thumbnail_url: Option<Option<String>>,
    /// Present citation fields, in publication-type order
    pub citations: Vec<CitationField>,
}

impl CatalogRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Partition the record into the fields named by `schema` and the
    /// remaining extras. Extras keep their original order and never contain
    /// a consumed key.
    pub fn split(self, schema: &SchemaConfig) -> (ConsumedFields, Map<String, Value>) {
        let mut rest = self.0;

        let manuscript_url = rest
            .shift_remove(&schema.manuscript_url)
            .and_then(value_text);
        let repository_url = rest
            .shift_remove(&schema.repository_url)
            .and_then(value_text);
        let thumbnail_url = rest.shift_remove(&schema.thumbnail_url).map(value_text);

        let citations = schema
            .publication_types
            .iter()
            .filter_map(|publication_type| {
                rest.shift_remove(&schema.citation_field(publication_type))
                    .map(|value| CitationField {
                        publication_type: publication_type.clone(),
                        value,
                    })
            })
            .collect();

        let consumed = ConsumedFields {
            manuscript_url,
            repository_url,
            thumbnail_url,
            citations,
        };
        (consumed, rest)
    }
}

impl From<Map<String, Value>> for CatalogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Scalar YAML values as text; null, empty strings and collections give `None`.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
