//! Compiled fetch requests shared across calls.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use oxide_store_core::dialect::DialectProfile;
use tracing::debug;

use crate::error::Result;
use crate::metadata::MetadataCatalog;
use crate::request::FetchRequest;

/// Cache key: class (and so table) plus both member selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub class: String,
    pub fetch: BTreeSet<usize>,
    pub store: BTreeSet<usize>,
}

impl FetchKey {
    #[must_use]
    pub fn new(class: &str, fetch: &[usize], store: &[usize]) -> Self {
        Self {
            class: class.to_string(),
            fetch: fetch.iter().copied().collect(),
            store: store.iter().copied().collect(),
        }
    }
}

/// Fetch requests compiled for one dialect profile.
#[derive(Debug, Default)]
pub struct FetchRequestCache {
    requests: RwLock<HashMap<FetchKey, Arc<FetchRequest>>>,
}

impl FetchRequestCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached request for the selection, compiling it on first
    /// use.
    ///
    /// # Errors
    ///
    /// See [`FetchRequest::compile`].
    pub fn get_or_compile(
        &self,
        catalog: &MetadataCatalog,
        profile: &DialectProfile,
        class: &str,
        fetch: &[usize],
        store: &[usize],
    ) -> Result<Arc<FetchRequest>> {
        let key = FetchKey::new(class, fetch, store);
        let cached = self
            .requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(request) = cached {
            return Ok(request);
        }

        let compiled = Arc::new(FetchRequest::compile(catalog, profile, class, fetch, store)?);
        let mut requests = self
            .requests
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(class = %class, cached = requests.len() + 1, "caching fetch request");
        Ok(Arc::clone(requests.entry(key).or_insert(compiled)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every compiled request, e.g. after metadata changes.
    pub fn clear(&self) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
