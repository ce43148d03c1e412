//! CSL JSON items as returned by citation resolvers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Contributor roles, in the order they are preferred for an author summary
pub const CONTRIBUTOR_ROLES: &[&str] = &[
    "author",
    "collection-editor",
    "composer",
    "container-author",
    "director",
    "editor",
    "editorial-director",
    "translator",
];

/// Why a resolved item was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CslError {
    #[error("CSL item must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("CSL item is empty")]
    Empty,

    #[error("CSL field {field:?} must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// A bibliographic item keyed by CSL field names.
///
/// Every field is optional and key order is kept as received, so an item
/// serializes back out exactly as the resolver produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CslItem(Map<String, Value>);

impl CslItem {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Accept a JSON value as a CSL item if it passes [`CslItem::check`].
    pub fn from_value(value: Value) -> Result<Self, CslError> {
        let item = match value {
            Value::Object(map) => Self(map),
            other => return Err(CslError::NotAnObject(json_type(&other))),
        };
        item.check()?;
        Ok(item)
    }

    /// Structural sanity check applied to every resolved item: non-empty,
    /// contributor roles are arrays of objects and `issued` is an object.
    pub fn check(&self) -> Result<(), CslError> {
        if self.0.is_empty() {
            return Err(CslError::Empty);
        }

        for role in CONTRIBUTOR_ROLES {
            match self.0.get(*role) {
                None => {}
                Some(Value::Array(names)) if names.iter().all(Value::is_object) => {}
                Some(_) => {
                    return Err(CslError::InvalidField {
                        field: role.to_string(),
                        expected: "an array of name objects",
                    })
                }
            }
        }

        if let Some(issued) = self.0.get("issued") {
            if !issued.is_object() {
                return Err(CslError::InvalidField {
                    field: "issued".to_string(),
                    expected: "a date object",
                });
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// The item's `URL` field, when it is a string
    pub fn url(&self) -> Option<&str> {
        self.0.get("URL").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for CslItem {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_accepts_object() {
        let item = CslItem::from_value(json!({
            "type": "article-journal",
            "title": "Opportunities and obstacles for deep learning",
            "author": [{"family": "Ching", "given": "Travers"}],
            "issued": {"date-parts": [[2018, 4]]},
            "URL": "https://doi.org/10.1098/rsif.2017.0387"
        }))
        .unwrap();

        assert_eq!(item.url(), Some("https://doi.org/10.1098/rsif.2017.0387"));
        assert!(item.contains_key("title"));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert_eq!(
            CslItem::from_value(json!(["not", "an", "item"])),
            Err(CslError::NotAnObject("an array"))
        );
        assert_eq!(CslItem::from_value(json!({})), Err(CslError::Empty));
    }

    #[test]
    fn test_check_contributor_shape() {
        let err = CslItem::from_value(json!({"title": "T", "editor": "Smith"})).unwrap_err();
        assert!(matches!(err, CslError::InvalidField { ref field, .. } if field == "editor"));

        let err = CslItem::from_value(json!({"title": "T", "issued": "2019"})).unwrap_err();
        assert!(matches!(err, CslError::InvalidField { ref field, .. } if field == "issued"));
    }

    #[test]
    fn test_serializes_in_source_order() {
        let item = CslItem::from_value(json!({"title": "T", "URL": "u", "author": []})).unwrap();
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"title":"T","URL":"u","author":[]}"#
        );
    }
}
