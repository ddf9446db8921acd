//! The store: shared server state and the window query pipeline.
//!
//! One `Store` is constructed at startup and handed to every request
//! handler. It owns the dataset registry, the result cache and the
//! running statistics; all of its operations take `&self` and are safe to
//! call concurrently.

use crate::cache::ResultCache;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::index::SpatialIndex;
use crate::manifest::{DatasetSummary, Manifest};
use crate::matcher::{self, MappingReport};
use crate::registry::Registry;
use crate::simplify::simplify_feature;
use areal_types::{BoundingBox, Feature, FeatureCollection, QueryKey, StoreStats};
use geo::{Intersects, Rect};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Shared state behind all request handlers.
#[derive(Debug)]
pub struct Store {
    config: Config,
    registry: Registry,
    cache: ResultCache,
    stats: Mutex<StoreStats>,
}

impl Store {
    /// Open a store over the configured data root.
    ///
    /// Reads the manifest eagerly; datasets themselves load lazily on
    /// first query.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad configuration, `NotFound` when the
    /// manifest file is absent, `DataCorrupt` when it does not parse.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let manifest = Manifest::from_file(&config.manifest_path())?;
        log::info!(
            "opened store with {} manifest entries under {}",
            manifest.entries.len(),
            config.data_root.display()
        );
        Ok(Self {
            registry: Registry::new(manifest, config.data_root.clone()),
            cache: ResultCache::new(config.cache_capacity),
            stats: Mutex::new(StoreStats::new()),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_root(&self) -> &Path {
        self.registry.data_root()
    }

    /// Snapshot of the running counters.
    pub fn stats(&self) -> StoreStats {
        self.stats.lock().clone()
    }

    /// Catalog of datasets whose backing file currently exists.
    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.registry.list()
    }

    /// Answer a window query.
    ///
    /// The requested box is quantized outward onto the configured cache
    /// grid, so the result covers at least the requested window. On a
    /// result-cache hit the stored collection is returned as-is; otherwise
    /// the pipeline runs candidate lookup, exact intersection, the
    /// optional containment filter and simplification, then stores the
    /// collection under the normalized key.
    pub fn window_query(
        &self,
        dataset_name: &str,
        window: &BoundingBox,
        within: Option<&str>,
    ) -> Result<Arc<FeatureCollection>> {
        window.validate()?;
        let key = QueryKey::new(dataset_name, within, window.quantize(self.config.bbox_digits));

        if let Some(cached) = self.cache.get(&key) {
            self.stats.lock().record_cache_hit();
            log::debug!("window query {key} served from cache");
            return Ok(cached);
        }
        self.stats.lock().record_cache_miss();

        let dataset = self.resolve(dataset_name)?;
        let query_rect = key.bounds().to_rect();
        let candidates = self.indexed(&dataset).candidates(&query_rect);

        let mut survivors: Vec<&Feature> = candidates
            .into_iter()
            .filter_map(|position| dataset.feature(position))
            .filter(|feature| feature.geometry.intersects_rect(&query_rect))
            .collect();

        if let Some(container_name) = within {
            let container = self.resolve(container_name)?;
            let container_index = self.indexed(&container);
            let containers: Vec<(&Feature, Rect)> = container_index
                .candidates(&query_rect)
                .into_iter()
                .filter_map(|position| {
                    let feature = container.feature(position)?;
                    let extent = feature.geometry.bounding_rect()?;
                    Some((feature, extent))
                })
                .collect();

            survivors.retain(|feature| {
                let Some(extent) = feature.geometry.bounding_rect() else {
                    return false;
                };
                containers.iter().any(|(container_feature, container_extent)| {
                    container_extent.intersects(&extent)
                        && feature.geometry.intersects(&container_feature.geometry)
                })
            });
        }

        let result: Arc<FeatureCollection> = Arc::new(
            survivors
                .into_iter()
                .map(|feature| simplify_feature(feature, self.config.simplify_tolerance))
                .collect(),
        );

        log::debug!("window query {key} computed {} features", result.len());
        self.cache.put(key, Arc::clone(&result));
        Ok(result)
    }

    /// Compute the full first-match mapping from `source` onto `target`.
    pub fn full_mapping(&self, source: &str, target: &str) -> Result<MappingReport> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        // Touch the target index through the stat-counting path.
        self.indexed(&target);

        let report = matcher::match_datasets(&source, &target);
        self.stats
            .lock()
            .record_mapping(report.pairs.len() as u64, report.skipped as u64);
        Ok(report)
    }

    fn resolve(&self, name: &str) -> Result<Arc<Dataset>> {
        let was_loaded = self.registry.is_loaded(name);
        let dataset = self.registry.get(name)?;
        if !was_loaded {
            self.stats.lock().record_dataset_loaded();
        }
        Ok(dataset)
    }

    fn indexed<'a>(&self, dataset: &'a Dataset) -> &'a SpatialIndex {
        let was_ready = dataset.index_ready();
        let index = dataset.index();
        if !was_ready {
            self.stats.lock().record_index_built();
        }
        index
    }
}
