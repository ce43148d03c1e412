//! Mock resolver for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::{CiteKey, CslItem};
use crate::sources::{ResolveError, Resolver};

/// A resolver that returns predefined CSL items.
///
/// Responses are keyed by standard citation id, so `DOI:10.1/X` and
/// `doi:10.1/x` share one response. Unknown citations resolve to
/// [`ResolveError::NotFound`].
#[derive(Debug, Default)]
pub struct MockResolver {
    responses: Mutex<HashMap<String, CslItem>>,
    calls: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockResolver {
    /// Create a new mock resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item returned for a citation.
    pub fn set_response(&self, citation: &str, item: CslItem) {
        let id = CiteKey::parse(citation).standard_id();
        lock(&self.responses).insert(id, item);
    }

    /// Clear the configured responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    /// Citations passed to `resolve`, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, citation: &str) -> Result<CslItem, ResolveError> {
        lock(&self.calls).push(citation.to_string());

        let id = CiteKey::parse(citation).standard_id();
        lock(&self.responses)
            .get(&id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(citation.to_string()))
    }
}
