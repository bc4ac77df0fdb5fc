//! Loaded-edition cache with LRU eviction
//!
//! Policy: at most `capacity` corpora stay resident; the least recently used
//! one is evicted when a new edition is loaded. Entries are never refreshed
//! behind the caller's back, only dropped by eviction, `invalidate` or `clear`.

use crate::corpus::Corpus;
use crate::error::TadabburError;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Used when a capacity of zero is requested
const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub len: usize,
    pub capacity: usize,
    pub identifiers: Vec<String>,
}

pub struct CorpusCache {
    cache: Mutex<LruCache<String, Arc<Corpus>>>,
}

impl CorpusCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, Arc<Corpus>>>, TadabburError> {
        self.cache
            .lock()
            .map_err(|_| TadabburError::Cache("Failed to acquire cache lock".to_string()))
    }

    /// Return the cached corpus or run `load` and remember its result.
    ///
    /// The lock is not held while loading; two concurrent misses may both load,
    /// and the later insert wins.
    pub fn get_or_load<F>(&self, identifier: &str, load: F) -> anyhow::Result<Arc<Corpus>>
    where
        F: FnOnce() -> anyhow::Result<Corpus>,
    {
        if let Some(corpus) = self.get(identifier)? {
            tracing::debug!(identifier, "corpus cache hit");
            return Ok(corpus);
        }

        tracing::debug!(identifier, "corpus cache miss");
        let corpus = Arc::new(load()?);
        self.insert(identifier, Arc::clone(&corpus))?;
        Ok(corpus)
    }

    pub fn get(&self, identifier: &str) -> Result<Option<Arc<Corpus>>, TadabburError> {
        Ok(self.lock()?.get(identifier).cloned())
    }

    pub fn insert(&self, identifier: &str, corpus: Arc<Corpus>) -> Result<(), TadabburError> {
        let mut cache = self.lock()?;
        if let Some((evicted, _)) = cache.push(identifier.to_string(), corpus) {
            if evicted != identifier {
                tracing::info!(evicted = %evicted, "evicted corpus from cache");
            }
        }
        Ok(())
    }

    /// Drop one edition; returns whether it was resident
    pub fn invalidate(&self, identifier: &str) -> Result<bool, TadabburError> {
        Ok(self.lock()?.pop(identifier).is_some())
    }

    pub fn clear(&self) -> Result<(), TadabburError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Resident identifiers, most recently used first
    pub fn stats(&self) -> Result<CacheStats, TadabburError> {
        let cache = self.lock()?;
        Ok(CacheStats {
            len: cache.len(),
            capacity: cache.cap().get(),
            identifiers: cache.iter().map(|(k, _)| k.clone()).collect(),
        })
    }
}
