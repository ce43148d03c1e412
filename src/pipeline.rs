//! One catalog run: load, enrich, summarize, write.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{load_catalog, write_catalog, LoadError, WriteError};
use crate::config::Config;
use crate::enrich::{EnrichOptions, EnrichWarning, Enricher};
use crate::sources::Resolver;
use crate::thumbnail::ThumbnailSource;

/// Fatal errors of a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub warnings: Vec<EnrichWarning>,
    pub missing_thumbnails: Vec<String>,
    pub output_path: PathBuf,
}

/// Enrich the catalog at `config.catalog_path` into `config.output_path`.
///
/// Per-record problems are reported in the summary; only reading the
/// catalog or writing the output fails the run.
pub async fn run(
    config: &Config,
    resolver: Arc<dyn Resolver>,
    thumbnails: Arc<dyn ThumbnailSource>,
) -> Result<RunSummary, PipelineError> {
    let records = load_catalog(&config.catalog_path)?;

    let enricher = Enricher::new(resolver, thumbnails, EnrichOptions::from_config(config));
    let (enriched, report) = enricher.enrich_catalog(records).await;

    tracing::info!(
        "The following manuscripts are missing thumbnails:\n{}",
        report.missing_thumbnails.join("\n")
    );

    write_catalog(&config.output_path, &enriched)?;
    if !report.is_clean() {
        tracing::info!("{} warnings while enriching the catalog", report.warnings.len());
    }

    Ok(RunSummary {
        records: enriched.len(),
        warnings: report.warnings,
        missing_thumbnails: report.missing_thumbnails,
        output_path: config.output_path.clone(),
    })
}
