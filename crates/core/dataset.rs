//! A loaded dataset: its features, identity scheme and lazy spatial index.

use crate::error::{ArealError, Result};
use crate::index::SpatialIndex;
use crate::manifest::ManifestEntry;
use areal_types::{Feature, FeatureCollection};
use once_cell::sync::OnceCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An immutable dataset held in memory.
///
/// The backing file is parsed once at load time. The spatial index is
/// built lazily on first use and memoized for the lifetime of the dataset.
#[derive(Debug)]
pub struct Dataset {
    name: String,
    path: PathBuf,
    id_property: Option<String>,
    collection: FeatureCollection,
    index: OnceCell<SpatialIndex>,
}

impl Dataset {
    /// Load a dataset from its manifest entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when the backing file is absent, `DataCorrupt` when it
    /// is not a valid GeoJSON FeatureCollection of (multi)polygons.
    pub fn load(entry: &ManifestEntry, data_root: &Path) -> Result<Self> {
        let path = data_root.join(&entry.path);
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ArealError::not_found(format!("dataset file {}", path.display()))
            }
            _ => ArealError::internal(format!("reading {}: {}", path.display(), e)),
        })?;
        let collection = FeatureCollection::from_geojson_str(&text).map_err(|e| {
            log::error!("corrupt dataset file {}: {}", path.display(), e);
            ArealError::data_corrupt(&path, e.to_string())
        })?;

        log::info!(
            "loaded dataset {} ({} features from {})",
            entry.name,
            collection.len(),
            path.display()
        );

        Ok(Self {
            name: entry.name.clone(),
            path,
            id_property: entry.id_property.clone(),
            collection,
            index: OnceCell::new(),
        })
    }

    /// Build a dataset directly from features, without a backing file.
    pub fn from_collection(name: &str, collection: FeatureCollection) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.geojson")),
            id_property: None,
            collection,
            index: OnceCell::new(),
        }
    }

    /// Declare the property that identifies features of this dataset.
    pub fn with_id_property(mut self, property: &str) -> Self {
        self.id_property = Some(property.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    pub fn feature(&self, position: usize) -> Option<&Feature> {
        self.collection.get(position)
    }

    /// Identifier of the feature at `position`.
    ///
    /// Uses the declared id property when present on the feature, the
    /// positional index otherwise.
    pub fn feature_id(&self, position: usize) -> String {
        self.id_property
            .as_deref()
            .and_then(|property| self.feature(position)?.property_text(property))
            .unwrap_or_else(|| position.to_string())
    }

    /// The spatial index, built on first call and reused afterwards.
    pub fn index(&self) -> &SpatialIndex {
        self.index.get_or_init(|| {
            log::debug!("building spatial index for dataset {}", self.name);
            SpatialIndex::build(&self.collection)
        })
    }

    /// Whether the index has already been built.
    pub fn index_ready(&self) -> bool {
        self.index.get().is_some()
    }
}
