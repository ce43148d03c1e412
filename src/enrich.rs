//! Record enrichment: promote identity URLs and citation fields of a catalog
//! record into resolved, display-ready blocks.
//!
//! Nothing here aborts a run. Conditions that drop part of a record become
//! [`EnrichWarning`]s, logged inside the record's span and collected in the
//! run's [`EnrichReport`].

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::Instrument;

use crate::config::{Config, SchemaConfig};
use crate::fields::{self, DEFAULT_AUTHORS_MAX_LENGTH};
use crate::models::{
    CatalogRecord, CitationField, ConsumedFields, CslItem, EnrichedItem, EnrichedRecord,
    IdentityBlock, ItemMetadata,
};
use crate::sources::{CitationRejected, ResolveError, Resolver};
use crate::thumbnail::ThumbnailSource;

/// A recoverable problem with one record, carrying the record's index
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnrichWarning {
    #[error("record {index} has no manuscript URL")]
    MissingManuscriptUrl { index: usize },

    #[error("unhandled citekey: {citation:?}")]
    UnhandledCitation {
        index: usize,
        publication_type: String,
        citation: String,
    },

    #[error("citekey failed inspection: {citation:?}\n{report}")]
    FailedInspection {
        index: usize,
        publication_type: String,
        citation: String,
        report: String,
    },

    #[error("could not resolve {citation:?}: {reason}")]
    ResolutionFailed {
        index: usize,
        citation: String,
        reason: String,
    },
}

impl EnrichWarning {
    /// Position of the offending record in the catalog
    pub fn index(&self) -> usize {
        match self {
            Self::MissingManuscriptUrl { index }
            | Self::UnhandledCitation { index, .. }
            | Self::FailedInspection { index, .. }
            | Self::ResolutionFailed { index, .. } => *index,
        }
    }
}

/// Warning log for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichReport {
    pub warnings: Vec<EnrichWarning>,
    /// Manuscripts that ended up without a thumbnail, in catalog order
    pub missing_thumbnails: Vec<String>,
}

impl EnrichReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a warning in the current span and keep it.
    pub fn warn(&mut self, warning: EnrichWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Warnings about the record at `index`
    pub fn warnings_for(&self, index: usize) -> impl Iterator<Item = &EnrichWarning> {
        self.warnings.iter().filter(move |w| w.index() == index)
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Settings the enricher needs from [`Config`]
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichOptions {
    pub schema: SchemaConfig,
    pub authors_max_length: usize,
}

impl EnrichOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            schema: config.schema.clone(),
            authors_max_length: config.authors_max_length,
        }
    }
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            authors_max_length: DEFAULT_AUTHORS_MAX_LENGTH,
        }
    }
}

/// Enriches catalog records one at a time.
#[derive(Debug, Clone)]
pub struct Enricher {
    resolver: Arc<dyn Resolver>,
    thumbnails: Arc<dyn ThumbnailSource>,
    options: EnrichOptions,
}

impl Enricher {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        thumbnails: Arc<dyn ThumbnailSource>,
        options: EnrichOptions,
    ) -> Self {
        Self {
            resolver,
            thumbnails,
            options,
        }
    }

    pub fn options(&self) -> &EnrichOptions {
        &self.options
    }

    /// Enrich every record in catalog order.
    pub async fn enrich_catalog(
        &self,
        records: Vec<CatalogRecord>,
    ) -> (Vec<EnrichedRecord>, EnrichReport) {
        let mut report = EnrichReport::new();
        let mut enriched = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let output = self.enrich_record(index, record, &mut report).await;
            if !output.has_thumbnail() {
                let label = output
                    .identity
                    .url
                    .clone()
                    .unwrap_or_else(|| format!("record {}", index));
                report.missing_thumbnails.push(label);
            }
            enriched.push(output);
        }

        (enriched, report)
    }

    /// Enrich one record. Warnings go to `report`; the record always yields
    /// an output with an identity block and extras.
    pub async fn enrich_record(
        &self,
        index: usize,
        record: CatalogRecord,
        report: &mut EnrichReport,
    ) -> EnrichedRecord {
        let (consumed, extras) = record.split(&self.options.schema);
        let span = tracing::info_span!(
            "record",
            index,
            url = consumed.manuscript_url.as_deref().unwrap_or_default()
        );

        self.enrich_fields(index, consumed, extras, report)
            .instrument(span)
            .await
    }

    async fn enrich_fields(
        &self,
        index: usize,
        consumed: ConsumedFields,
        extras: Map<String, Value>,
        report: &mut EnrichReport,
    ) -> EnrichedRecord {
        let ConsumedFields {
            manuscript_url,
            repository_url,
            thumbnail_url,
            citations,
        } = consumed;

        let thumbnail_url = match (thumbnail_url, &manuscript_url) {
            (Some(supplied), _) => supplied,
            (None, Some(page_url)) => self.thumbnails.thumbnail_url(page_url).await,
            (None, None) => None,
        };

        let mut identity = IdentityBlock {
            repo_url: repository_url,
            url: manuscript_url.clone(),
            citation: manuscript_url.as_ref().map(|url| format!("url:{}", url)),
            thumbnail_url: thumbnail_url.filter(|url| !url.trim().is_empty()),
            metadata: None,
        };
        if manuscript_url.is_none() {
            report.warn(EnrichWarning::MissingManuscriptUrl { index });
        }

        let accepted: Vec<(String, String)> = citations
            .into_iter()
            .filter_map(|field| self.accept_citation(index, field, report))
            .collect();

        if let Some(citation) = identity.citation.clone() {
            match self.resolve(&citation).await {
                Ok(item) => {
                    if !self.options.schema.prefer_explicit_url || identity.url.is_none() {
                        if let Some(url) = item.url() {
                            identity.url = Some(url.to_string());
                        }
                    }
                    identity.metadata = Some(self.metadata(item));
                }
                Err(e) => report.warn(EnrichWarning::ResolutionFailed {
                    index,
                    citation,
                    reason: e.to_string(),
                }),
            }
        }

        let mut publications = Vec::with_capacity(accepted.len());
        for (publication_type, citation) in accepted {
            match self.resolve(&citation).await {
                Ok(item) => {
                    let block = EnrichedItem {
                        url: item.url().map(String::from),
                        citation,
                        metadata: self.metadata(item),
                    };
                    publications.push((publication_type, block));
                }
                Err(e) => report.warn(EnrichWarning::ResolutionFailed {
                    index,
                    citation,
                    reason: e.to_string(),
                }),
            }
        }

        EnrichedRecord {
            identity,
            publications,
            extras,
        }
    }

    /// The standard citation for a publication field, or `None` when the
    /// field is blank or rejected.
    fn accept_citation(
        &self,
        index: usize,
        field: CitationField,
        report: &mut EnrichReport,
    ) -> Option<(String, String)> {
        let CitationField {
            publication_type,
            value,
        } = field;

        let citation = match value {
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => s.trim().to_string(),
            ref other if is_blank(other) => return None,
            other => {
                report.warn(EnrichWarning::UnhandledCitation {
                    index,
                    publication_type,
                    citation: other.to_string(),
                });
                return None;
            }
        };

        match self.resolver.validate(&citation) {
            Ok(()) => {
                let standard = self.resolver.normalize(&citation);
                Some((publication_type, standard))
            }
            Err(CitationRejected::Unhandled(citation)) => {
                report.warn(EnrichWarning::UnhandledCitation {
                    index,
                    publication_type,
                    citation,
                });
                None
            }
            Err(CitationRejected::FailedInspection {
                citation,
                report: inspection,
            }) => {
                report.warn(EnrichWarning::FailedInspection {
                    index,
                    publication_type,
                    citation,
                    report: inspection,
                });
                None
            }
        }
    }

    async fn resolve(&self, citation: &str) -> Result<CslItem, ResolveError> {
        let item = self.resolver.resolve(citation).await?;
        item.check()?;
        Ok(item)
    }

    fn metadata(&self, item: CslItem) -> ItemMetadata {
        ItemMetadata {
            title: fields::title(&item),
            authors: fields::authors_text(&item, self.options.authors_max_length),
            journal: fields::journal(&item),
            date_iso: fields::date_iso(&item),
            date_human: fields::date_human(&item),
            csl_item: item,
        }
    }
}

/// Values a catalog author would read as "no citation"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
