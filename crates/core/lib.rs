//! Viewport-scoped polygon dataset engine.
//!
//! ## Features
//! - **Lazy dataset registry**: GeoJSON files load on first access, with
//!   coalesced concurrent first loads
//! - **Spatial indexing**: per-dataset R-tree over feature envelopes,
//!   built once and memoized
//! - **Window queries**: quantized viewport boxes, exact intersection
//!   confirmation, optional containment filtering, vertex reduction
//! - **Result caching**: strict LRU over normalized query keys
//! - **Cross-dataset mapping**: first-match ownership report between two
//!   datasets
//!
//! ## Window normalization
//! Query windows are snapped **outward** onto a fixed grid before anything
//! else happens:
//! - The normalized window always contains the requested one, so no
//!   visible feature is lost to rounding
//! - Nearby viewports collapse onto the same cache key, so panning reuses
//!   cached results
//!
//! ```no_run
//! use areal::{Config, Store};
//! use areal_types::BoundingBox;
//!
//! let store = Store::open(Config::default().with_data_root("data"))?;
//!
//! // Everything of the plz dataset visible over Germany
//! let germany = BoundingBox::new(5.2, 47.9, 15.7, 54.9);
//! let collection = store.window_query("plz", &germany, None)?;
//!
//! // The same window, restricted to features touching some wahlkreis
//! let filtered = store.window_query("plz", &germany, Some("wahlkreise"))?;
//! assert!(filtered.len() <= collection.len());
//! # Ok::<(), areal::ArealError>(())
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod manifest;
pub mod matcher;
pub mod registry;
pub mod simplify;
pub mod store;

pub use error::{ArealError, Result};
pub use store::Store;

pub use cache::ResultCache;
pub use config::Config;
pub use dataset::Dataset;
pub use index::SpatialIndex;
pub use manifest::{DatasetSummary, GeometryKind, Manifest, ManifestEntry};
pub use matcher::{MappingReport, MatchPair, match_datasets};
pub use registry::Registry;
pub use simplify::{simplify_feature, simplify_geometry};

pub use areal_types::{
    BoundingBox, Feature, FeatureCollection, Fingerprint, Geometry, QuantizedBounds, QueryKey,
    StoreStats,
};
pub use geo::Rect;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ArealError, Result, Store};

    pub use crate::{Config, Manifest, ManifestEntry};

    pub use crate::{BoundingBox, Feature, FeatureCollection, Geometry, QueryKey};

    pub use crate::{MappingReport, MatchPair};

    pub use geo::Rect;
}
