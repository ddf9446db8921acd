//! # areal-types
//!
//! Core value types for the Areal dataset server.
//!
//! This crate provides the vocabulary shared by the server and the client:
//!
//! - **Viewport types**: `BoundingBox`, `QuantizedBounds`
//! - **Feature types**: `Geometry`, `Feature`, `FeatureCollection`
//! - **Identity types**: `Fingerprint`, `QueryKey`
//! - **Observability**: `StoreStats`
//!
//! All types are serializable with Serde and built on top of the `geo`
//! crate's geometric primitives. GeoJSON conversions are available behind
//! the `geojson` feature.
//!
//! ## Examples
//!
//! ```rust
//! use areal_types::bbox::BoundingBox;
//! use areal_types::key::QueryKey;
//!
//! // A viewport over Bavaria, snapped outward onto the whole-degree grid
//! let viewport = BoundingBox::new(10.1, 47.4, 12.9, 49.7);
//! let key = QueryKey::new("plz", None, viewport.quantize(0));
//! assert_eq!(key.to_string(), "plz@10,47,13,50");
//! ```

pub mod bbox;
pub mod feature;
pub mod fingerprint;
pub mod geometry;
pub mod key;
pub mod stats;

pub use bbox::{BboxError, BoundingBox, QuantizedBounds};
pub use feature::{Feature, FeatureCollection, FeatureError};
pub use fingerprint::Fingerprint;
pub use geometry::Geometry;
pub use key::QueryKey;
pub use stats::StoreStats;
