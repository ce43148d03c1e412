//! Registry for managing citation source plugins.

use async_trait::async_trait;
use std::sync::Arc;

use super::{
    ArxivSource, CitationSource, DoiSource, PubMedSource, ResolveError, Resolver, UrlSource,
};
use crate::config::Config;
use crate::models::{CiteKey, CitePrefix, CslItem};
use crate::utils::HttpClient;

/// Registry for all available citation sources
///
/// Sources are consulted in registration order; the first one handling a
/// key's prefix resolves it.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
    sources: Vec<Arc<dyn CitationSource>>,
}

impl ResolverRegistry {
    /// Create a registry with every built-in source, configured from `config`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = HttpClient::from_config(&config.http)?;
        let doi = DoiSource::with_base_url(client.clone(), &config.resolvers.doi_base_url);

        let mut registry = Self::empty();
        registry.register(Arc::new(doi.clone()));
        registry.register(Arc::new(ArxivSource::new(doi)));
        registry.register(Arc::new(PubMedSource::with_base_url(
            client.clone(),
            &config.resolvers.ncbi_base_url,
        )));
        registry.register(Arc::new(UrlSource::new(client)));

        Ok(registry)
    }

    /// Create a registry with no sources
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a new source; a source with the same ID is replaced
    pub fn register(&mut self, source: Arc<dyn CitationSource>) {
        match self.sources.iter().position(|s| s.id() == source.id()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn CitationSource>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// The source that resolves keys with `prefix`
    pub fn source_for(&self, prefix: &CitePrefix) -> Option<&Arc<dyn CitationSource>> {
        self.sources.iter().find(|s| s.handles(prefix))
    }

    /// Get all source IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl Resolver for ResolverRegistry {
    async fn resolve(&self, citation: &str) -> Result<CslItem, ResolveError> {
        let key = CiteKey::parse(citation);
        let source = key
            .prefix()
            .and_then(|prefix| self.source_for(prefix))
            .ok_or_else(|| ResolveError::Unsupported(citation.to_string()))?;

        tracing::debug!("Resolving {} with {}", citation, source.name());
        let item = source.fetch(&key).await?;
        item.check()?;
        Ok(item)
    }
}
