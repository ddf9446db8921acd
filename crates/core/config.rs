//! Configuration for the areal engine.

use crate::error::{ArealError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the manifest and all dataset files
    #[serde(default = "Config::default_data_root")]
    pub data_root: PathBuf,

    /// Manifest file name, relative to the data root
    #[serde(default = "Config::default_manifest_file")]
    pub manifest_file: String,

    /// Digit precision used to quantize query windows onto the cache grid
    #[serde(default = "Config::default_bbox_digits")]
    pub bbox_digits: u8,

    /// Ramer-Douglas-Peucker tolerance in coordinate degrees; 0 disables
    /// simplification
    #[serde(default = "Config::default_simplify_tolerance")]
    pub simplify_tolerance: f64,

    /// Maximum number of window results kept in the LRU cache
    #[serde(default = "Config::default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: Self::default_data_root(),
            manifest_file: Self::default_manifest_file(),
            bbox_digits: Self::default_bbox_digits(),
            simplify_tolerance: Self::default_simplify_tolerance(),
            cache_capacity: Self::default_cache_capacity(),
        }
    }
}

impl Config {
    /// Largest supported quantization precision. Nine digits keeps the
    /// scaled grid coordinates comfortably inside `i64` at any longitude.
    pub const MAX_BBOX_DIGITS: u8 = 9;

    fn default_data_root() -> PathBuf {
        PathBuf::from("data")
    }

    fn default_manifest_file() -> String {
        "datasets.json".to_string()
    }

    const fn default_bbox_digits() -> u8 {
        0
    }

    const fn default_simplify_tolerance() -> f64 {
        0.001
    }

    const fn default_cache_capacity() -> usize {
        64
    }

    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn with_manifest_file(mut self, manifest_file: impl Into<String>) -> Self {
        self.manifest_file = manifest_file.into();
        self
    }

    pub fn with_bbox_digits(mut self, digits: u8) -> Self {
        assert!(
            digits <= Self::MAX_BBOX_DIGITS,
            "Bbox digit precision must be at most {}",
            Self::MAX_BBOX_DIGITS
        );
        self.bbox_digits = digits;
        self
    }

    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "Simplify tolerance must be a finite non-negative number"
        );
        self.simplify_tolerance = tolerance;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cache capacity must be greater than zero");
        self.cache_capacity = capacity;
        self
    }

    /// Absolute or root-relative path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_root.join(&self.manifest_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bbox_digits > Self::MAX_BBOX_DIGITS {
            return Err(ArealError::invalid_argument(format!(
                "bbox digit precision {} exceeds the maximum of {}",
                self.bbox_digits,
                Self::MAX_BBOX_DIGITS
            )));
        }
        if !self.simplify_tolerance.is_finite() || self.simplify_tolerance < 0.0 {
            return Err(ArealError::invalid_argument(
                "simplify tolerance must be a finite non-negative number",
            ));
        }
        if self.cache_capacity == 0 {
            return Err(ArealError::invalid_argument(
                "cache capacity must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| ArealError::invalid_argument(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ArealError::internal(e.to_string()))
    }
}
