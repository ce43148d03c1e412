//! Reading the YAML input catalog and writing the enriched JSON catalog.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{CatalogRecord, EnrichedRecord};

/// Errors that abort a run before enrichment starts
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Catalog {path} must be a sequence of records")]
    NotASequence { path: PathBuf },
}

/// Errors writing the output catalog
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the records of the YAML catalog at `path`.
///
/// Entries that are not mappings are skipped with a warning. An empty
/// document is an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_catalog(&text, path)?;
    tracing::info!("catalog consists of {} records", records.len());
    Ok(records)
}

fn parse_catalog(text: &str, path: &Path) -> Result<Vec<CatalogRecord>, LoadError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match document {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        _ => {
            return Err(LoadError::NotASequence {
                path: path.to_path_buf(),
            })
        }
    };

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(fields) => Some(CatalogRecord::new(fields)),
            other => {
                tracing::warn!("Skipping catalog entry {}: not a mapping ({})", index, other);
                None
            }
        })
        .collect();
    Ok(records)
}

/// Write `records` as pretty-printed JSON with a trailing newline,
/// creating the parent directory and replacing any existing file.
pub fn write_catalog(path: &Path, records: &[EnrichedRecord]) -> Result<(), WriteError> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');

    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, json).map_err(io_error)?;

    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
