//! Artifact caching for sharing loaded artifacts across pipelines.

use crate::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

// Stores WEAK references: an artifact is freed once every pipeline holding it drops.
type CacheStorage = HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>;

/// Caller-owned cache of loaded artifacts, keyed by artifact type and a string key.
///
/// Cloning is cheap and clones share the same storage.
///
/// ```rust,no_run
/// use review_sentiment::sentiment::SentimentPipelineBuilder;
/// use review_sentiment::ArtifactCache;
///
/// # fn main() -> review_sentiment::Result<()> {
/// let cache = ArtifactCache::new();
/// let a = SentimentPipelineBuilder::from_dir("artifacts").cache(&cache).build()?;
/// let b = SentimentPipelineBuilder::from_dir("artifacts").cache(&cache).build()?;
/// // `a` and `b` share one tagger, lemmatizer, vectorizer and classifier.
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ArtifactCache {
    cache: Arc<Mutex<CacheStorage>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStorage> {
        // A poisoned map still only holds complete weak pointers.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the live artifact stored under `key`, or load and remember it.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        {
            let mut cache = self.lock();
            if let Some(boxed) = cache.get(&cache_key) {
                if let Some(strong) = boxed.downcast_ref::<Weak<M>>().and_then(Weak::upgrade) {
                    return Ok(strong);
                }
                cache.remove(&cache_key);
            }
        }

        let artifact = Arc::new(loader()?);

        {
            let mut cache = self.lock();
            let weak: Weak<M> = Arc::downgrade(&artifact);
            cache.insert(cache_key, Box::new(weak));
        }

        Ok(artifact)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries, dead ones included until they are next looked up.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("entries", &self.len())
            .finish()
    }
}
