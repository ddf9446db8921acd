//! Dataset manifest: the catalog of datasets a data root offers.
//!
//! The manifest is a JSON file living at the data root. Each entry names a
//! dataset, points at its backing GeoJSON file and may declare a display
//! label and the property that identifies individual features. The listing
//! operation filters entries down to those whose backing file currently
//! exists on disk, so a half-provisioned data directory degrades to a
//! shorter catalog instead of a broken one.

use crate::error::{ArealError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Declared geometry shape of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
    /// Both shapes occur in the file
    Mixed,
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// Stable dataset name used in requests
    pub name: String,
    /// Backing file path, relative to the data root
    pub path: String,
    /// Declared geometry shape
    pub kind: GeometryKind,
    /// Human-readable label for catalogs and pickers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Property that identifies a feature (for example `plz` or `WKR_NAME`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_property: Option<String>,
}

/// The parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

/// Catalog row returned by the dataset listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: GeometryKind,
    pub path: String,
}

impl From<&ManifestEntry> for DatasetSummary {
    fn from(entry: &ManifestEntry) -> Self {
        Self {
            name: entry.name.clone(),
            label: entry.label.clone(),
            kind: entry.kind,
            path: entry.path.clone(),
        }
    }
}

impl Manifest {
    /// Read and parse the manifest file.
    ///
    /// # Errors
    ///
    /// `NotFound` when the file is absent, `DataCorrupt` when it is not
    /// valid manifest JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ArealError::not_found(format!("manifest {}", path.display()))
            }
            _ => ArealError::internal(format!("reading manifest {}: {}", path.display(), e)),
        })?;
        serde_json::from_str(&text).map_err(|e| ArealError::data_corrupt(path, e.to_string()))
    }

    /// Look up an entry by dataset name.
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entries whose backing file currently exists under the data root.
    pub fn available(&self, data_root: &Path) -> Vec<&ManifestEntry> {
        self.entries
            .iter()
            .filter(|entry| data_root.join(&entry.path).is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "entries": [
            {
                "name": "plz",
                "path": "plz/gebiete.geojson",
                "kind": "multipolygon",
                "label": "Postleitzahlgebiete",
                "id_property": "plz"
            },
            {
                "name": "wahlkreise",
                "path": "wahlkreise/btw25.geojson",
                "kind": "polygon"
            }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.entries.len(), 2);

        let plz = manifest.entry("plz").unwrap();
        assert_eq!(plz.kind, GeometryKind::MultiPolygon);
        assert_eq!(plz.id_property.as_deref(), Some("plz"));

        let wahl = manifest.entry("wahlkreise").unwrap();
        assert_eq!(wahl.label, None);
        assert!(manifest.entry("bundeslaender").is_none());
    }

    #[test]
    fn test_available_filters_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("plz")).unwrap();
        std::fs::write(dir.path().join("plz/gebiete.geojson"), "{}").unwrap();

        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let available = manifest.available(dir.path());
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "plz");
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Manifest::from_file(&dir.path().join("datasets.json"));
        assert!(matches!(missing, Err(ArealError::NotFound(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "entries: nope").unwrap();
        assert!(matches!(
            Manifest::from_file(&bad),
            Err(ArealError::DataCorrupt { .. })
        ));
    }

    #[test]
    fn test_summary_from_entry() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let summary = DatasetSummary::from(manifest.entry("plz").unwrap());
        assert_eq!(summary.name, "plz");
        assert_eq!(summary.label.as_deref(), Some("Postleitzahlgebiete"));
        assert_eq!(summary.kind, GeometryKind::MultiPolygon);
    }
}
