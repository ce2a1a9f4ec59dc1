//! In-memory cache of resolved scalar paths, keyed by query identity.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::spec::Query;
use crate::spec::QueryHash;
use crate::spec::ScalarOccurrence;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct ScalarPathsKey {
    query_hash: QueryHash,
    operation_name: Option<String>,
}

impl ScalarPathsKey {
    fn of(query: &Query) -> Self {
        Self {
            query_hash: query.hash(),
            operation_name: query.operation_name().map(str::to_string),
        }
    }
}

/// Scalar occurrences of the queries seen so far.
///
/// Entries are only valid for the schema and transform table they were resolved
/// with, so a cache is owned by a single exchange and never shared.
pub(crate) struct ScalarPathsCache {
    inner: Mutex<LruCache<ScalarPathsKey, Arc<Vec<ScalarOccurrence>>>>,
}

impl ScalarPathsCache {
    pub(crate) fn new(limit: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(limit)),
        }
    }

    /// Returns the cached occurrences of `query`, resolving them with `resolve`
    /// on a miss.
    ///
    /// The lock is not held while resolving: concurrent misses on the same query
    /// both resolve it, and store equal results.
    pub(crate) fn get_or_resolve(
        &self,
        query: &Query,
        resolve: impl FnOnce() -> Vec<ScalarOccurrence>,
    ) -> Arc<Vec<ScalarOccurrence>> {
        let key = ScalarPathsKey::of(query);
        if let Some(occurrences) = self.inner.lock().get(&key) {
            tracing::trace!(query.hash = %key.query_hash, "scalar paths cache hit");
            return occurrences.clone();
        }

        tracing::trace!(query.hash = %key.query_hash, "scalar paths cache miss");
        let occurrences = Arc::new(resolve());
        self.inner.lock().put(key, occurrences.clone());
        occurrences
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}
