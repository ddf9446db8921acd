//! Viewport session: one dataset, one optional containment filter, one
//! additive layer.
//!
//! The session owns the request cache and the layer view and decides what a
//! settled viewport turns into on the wire. Move events are collapsed to
//! the latest pending window. Context changes (dataset or containment
//! switch) bump a version counter; a window result that started under an
//! older version is dropped on arrival instead of being merged into the
//! new context's layer. A late result from the *same* context is still
//! merged, since the layer only ever grows.

use crate::cache::RequestCache;
use crate::error::Result;
use crate::viewport::{LayerState, LayerView};
use areal_types::{BoundingBox, Feature, FeatureCollection, QueryKey};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Transport used to resolve one window query.
///
/// Implementations issue the actual request; the session handles caching,
/// coalescing, and merging above them.
pub trait WindowLoader {
    fn load(&self, key: &QueryKey) -> impl Future<Output = Result<FeatureCollection>> + Send;
}

#[derive(Debug, Clone)]
struct Context {
    dataset: String,
    within: Option<String>,
}

pub struct Session<L> {
    loader: L,
    cache: RequestCache,
    view: Mutex<LayerView>,
    context: Mutex<Context>,
    /// Bumped under the context lock on every context change.
    version: AtomicU64,
    /// Latest window from `note_move`, consumed by `flush`.
    pending: Mutex<Option<BoundingBox>>,
    bbox_digits: u8,
}

impl<L: WindowLoader> Session<L> {
    pub fn new(loader: L, dataset: impl Into<String>) -> Self {
        Self {
            loader,
            cache: RequestCache::new(),
            view: Mutex::new(LayerView::new()),
            context: Mutex::new(Context {
                dataset: dataset.into(),
                within: None,
            }),
            version: AtomicU64::new(0),
            pending: Mutex::new(None),
            bbox_digits: 0,
        }
    }

    /// Grid precision for window normalization. Must match the server's
    /// configured precision or the caches on the two sides key differently.
    pub fn with_bbox_digits(mut self, digits: u8) -> Self {
        self.bbox_digits = digits;
        self
    }

    /// Start the session with a containment filter already applied.
    pub fn with_containment(self, within: impl Into<String>) -> Self {
        self.context.lock().within = Some(within.into());
        self
    }

    pub fn dataset(&self) -> String {
        self.context.lock().dataset.clone()
    }

    pub fn containment(&self) -> Option<String> {
        self.context.lock().within.clone()
    }

    pub fn context_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> LayerState {
        self.view.lock().state()
    }

    pub fn rendered_len(&self) -> usize {
        self.view.lock().len()
    }

    /// Copy of the rendered features in first-delivery order.
    pub fn snapshot(&self) -> Vec<Feature> {
        self.view.lock().rendered().to_vec()
    }

    pub fn request_cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Switch to another dataset. The layer is cleared; accumulated
    /// features belong to the old dataset. Switching to the current
    /// dataset is a no-op.
    pub fn change_dataset(&self, dataset: impl Into<String>) {
        let dataset = dataset.into();
        let mut context = self.context.lock();
        if context.dataset == dataset {
            return;
        }
        log::debug!("dataset {} -> {}", context.dataset, dataset);
        context.dataset = dataset;
        self.invalidate(&mut context);
    }

    /// Change or clear the containment filter. The layer is cleared; a
    /// feature accepted under one filter may not exist under another.
    pub fn change_containment(&self, within: Option<&str>) {
        let mut context = self.context.lock();
        if context.within.as_deref() == within {
            return;
        }
        context.within = within.map(str::to_string);
        self.invalidate(&mut context);
    }

    // Takes the held context guard so the bump is ordered with the change.
    fn invalidate(&self, _context: &mut Context) {
        self.version.fetch_add(1, Ordering::SeqCst);
        self.view.lock().reset();
    }

    /// Handle a settled viewport: normalize, fetch through the request
    /// cache, and merge the result into the layer.
    ///
    /// Returns the number of features newly added. Returns zero without
    /// merging when the context changed while the request was in flight.
    pub async fn on_viewport(&self, window: &BoundingBox) -> Result<usize> {
        window.validate()?;
        let (key, version) = {
            let context = self.context.lock();
            let key = QueryKey::new(
                &context.dataset,
                context.within.as_deref(),
                window.quantize(self.bbox_digits),
            );
            (key, self.version.load(Ordering::SeqCst))
        };

        let collection = self.cache.fetch(&key, || self.loader.load(&key)).await?;

        if self.version.load(Ordering::SeqCst) != version {
            log::debug!("discarding stale window {key}");
            return Ok(0);
        }
        Ok(self.view.lock().merge(&collection))
    }

    /// Record a viewport move. Only the latest window is kept; a burst of
    /// move events collapses into a single query at the next `flush`.
    pub fn note_move(&self, window: BoundingBox) {
        *self.pending.lock() = Some(window);
    }

    /// Resolve the pending window, if any.
    pub async fn flush(&self) -> Result<usize> {
        let window = self.pending.lock().take();
        match window {
            Some(window) => self.on_viewport(&window).await,
            None => Ok(0),
        }
    }
}
