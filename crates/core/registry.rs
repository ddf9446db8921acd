//! Dataset registry: name to loaded dataset, with coalesced first loads.
//!
//! Datasets are written at most once (on first access) and read thereafter.
//! Concurrent first requests for the same name share a single load through
//! a per-name once-cell; a failed load leaves the cell empty, so a later
//! request retries from scratch once the file has been fixed.

use crate::dataset::Dataset;
use crate::error::{ArealError, Result};
use crate::manifest::{DatasetSummary, Manifest};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lazily-populated map from dataset name to loaded dataset.
#[derive(Debug, Default)]
pub struct Registry {
    data_root: PathBuf,
    manifest: Manifest,
    slots: DashMap<String, Arc<OnceCell<Arc<Dataset>>>>,
}

impl Registry {
    pub fn new(manifest: Manifest, data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            manifest,
            slots: DashMap::new(),
        }
    }

    /// Resolve a dataset by name, loading it on first access.
    ///
    /// # Errors
    ///
    /// `NotFound` for names absent from the manifest or whose backing file
    /// is missing, `DataCorrupt` when the backing file does not parse.
    pub fn get(&self, name: &str) -> Result<Arc<Dataset>> {
        let entry = self
            .manifest
            .entry(name)
            .ok_or_else(|| ArealError::not_found(format!("dataset {name}")))?;

        // Clone the slot out of the map guard so the shard lock is released
        // before the (possibly slow) load runs.
        let slot = self.slots.entry(name.to_string()).or_default().clone();
        let dataset = slot.get_or_try_init(|| Dataset::load(entry, &self.data_root).map(Arc::new))?;
        Ok(Arc::clone(dataset))
    }

    /// Whether a dataset has finished loading.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Catalog of datasets whose backing file currently exists.
    pub fn list(&self) -> Vec<DatasetSummary> {
        self.manifest
            .available(&self.data_root)
            .into_iter()
            .map(DatasetSummary::from)
            .collect()
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}
