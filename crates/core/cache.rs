//! Bounded result cache keyed by normalized query keys.
//!
//! Values are pure functions of (dataset contents, key), so a race where
//! two requests compute and store the same key is harmless. The cache
//! therefore needs no cross-request coordination beyond one lock around
//! the recency list.

use areal_types::{FeatureCollection, QueryKey};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Strict least-recently-used cache over computed window results.
///
/// Both `get` and `put` mark the key most-recently-used; inserting beyond
/// capacity evicts exactly the least-recently-used key.
pub struct ResultCache {
    entries: Mutex<LruCache<QueryKey, Arc<FeatureCollection>>>,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` results.
    ///
    /// A zero capacity is clamped to one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch a cached result, marking the key most-recently-used.
    pub fn get(&self, key: &QueryKey) -> Option<Arc<FeatureCollection>> {
        self.entries.lock().get(key).cloned()
    }

    /// Store a result, marking the key most-recently-used and evicting the
    /// least-recently-used entry when over capacity.
    pub fn put(&self, key: QueryKey, value: Arc<FeatureCollection>) {
        self.entries.lock().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("ResultCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap().get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use areal_types::BoundingBox;

    fn key(name: &str) -> QueryKey {
        let offset = name.len() as f64;
        let bounds = BoundingBox::new(offset, 0.0, offset + 1.0, 1.0).quantize(0);
        QueryKey::new(name, None, bounds)
    }

    fn value() -> Arc<FeatureCollection> {
        Arc::new(FeatureCollection::empty())
    }

    #[test]
    fn test_insert_third_evicts_least_recent() {
        let cache = ResultCache::new(2);
        let (a, b, c) = (key("a"), key("bb"), key("ccc"));

        cache.put(a.clone(), value());
        cache.put(b.clone(), value());
        cache.put(c.clone(), value());

        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = ResultCache::new(2);
        let (a, b, c) = (key("a"), key("bb"), key("ccc"));

        cache.put(a.clone(), value());
        cache.put(b.clone(), value());
        assert!(cache.get(&a).is_some());
        cache.put(c.clone(), value());

        // b was least-recently-used after the touch on a.
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&c).is_some());
    }

    #[test]
    fn test_put_refreshes_recency() {
        let cache = ResultCache::new(2);
        let (a, b, c) = (key("a"), key("bb"), key("ccc"));

        cache.put(a.clone(), value());
        cache.put(b.clone(), value());
        cache.put(a.clone(), value());
        cache.put(c.clone(), value());

        assert!(cache.get(&b).is_none());
        assert!(cache.get(&a).is_some());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache = ResultCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put(key("a"), value());
        assert_eq!(cache.len(), 1);
    }
}
