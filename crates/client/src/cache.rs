//! Session-scoped request memo with in-flight coalescing.
//!
//! One slot per [`QueryKey`]. A resolved slot answers without invoking the
//! loader again; an in-flight slot parks new callers on the same pending
//! load instead of issuing a duplicate request. Entries persist for the
//! lifetime of the session, which is bounded by how many distinct quantized
//! windows a user can visit.

use crate::error::Result;
use areal_types::{FeatureCollection, QueryKey};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Default)]
pub struct RequestCache {
    slots: DashMap<QueryKey, Arc<OnceCell<Arc<FeatureCollection>>>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the collection for `key`, invoking `loader` at most once per
    /// key no matter how many callers arrive while the load is in flight.
    ///
    /// A failed load leaves the slot unresolved, so the next fetch for the
    /// same key tries again.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> Result<Arc<FeatureCollection>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FeatureCollection>>,
    {
        // Clone the slot out so the shard lock is not held across the await.
        let slot = self.slots.entry(key.clone()).or_default().clone();
        let value = slot
            .get_or_try_init(|| async { loader().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(value))
    }

    /// True once a fetch for `key` has completed successfully.
    pub fn is_resolved(&self, key: &QueryKey) -> bool {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of slots, resolved or in flight.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use areal_types::{BoundingBox, Feature, Geometry};
    use geo::polygon;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(name: &str, west: f64) -> QueryKey {
        let bounds = BoundingBox::new(west, 0.0, west + 1.0, 1.0).quantize(0);
        QueryKey::new(name, None, bounds)
    }

    fn collection() -> FeatureCollection {
        let square: Geometry = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]
        .into();
        FeatureCollection::new(vec![Feature::bare(square)])
    }

    #[tokio::test]
    async fn test_second_fetch_reuses_first_result() {
        let cache = RequestCache::new();
        let calls = AtomicUsize::new(0);
        let key = key("plz", 13.0);

        let first = cache
            .fetch(&key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(collection())
            })
            .await
            .unwrap();
        let second = cache
            .fetch(&key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(collection())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_resolved(&key));
    }

    #[tokio::test]
    async fn test_distinct_keys_load_separately() {
        let cache = RequestCache::new();
        let calls = AtomicUsize::new(0);

        for west in [13.0, 14.0] {
            cache
                .fetch(&key("plz", west), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(collection())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let cache = RequestCache::new();
        let key = key("plz", 13.0);

        let err = cache
            .fetch(&key, || async {
                Err(ClientError::Transport("connection refused".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(!cache.is_resolved(&key));

        let value = cache.fetch(&key, || async { Ok(collection()) }).await;
        assert_eq!(value.unwrap().len(), 1);
        assert!(cache.is_resolved(&key));
    }
}
