//! # areal-client
//!
//! Map-viewport companion to the areal server. The server answers one
//! window at a time; this crate turns a stream of viewport events into as
//! few window queries as possible and folds the answers into a
//! duplicate-free render layer.
//!
//! - [`RequestCache`]: per-key memo with in-flight coalescing
//! - [`LayerView`]: additive fingerprint-deduplicated feature layer
//! - [`Session`]: viewport controller tying the two together
//! - `HttpLoader` (optional): REST transport, enable with the `http` feature
//!
//! # Example
//!
//! ```ignore
//! use areal_client::{HttpLoader, Session};
//! use areal_types::BoundingBox;
//!
//! let session = Session::new(HttpLoader::new("http://localhost:3001"), "plz");
//! let added = session.on_viewport(&BoundingBox::new(13.0, 52.3, 13.8, 52.7)).await?;
//! println!("{} features on screen", added);
//! ```

pub mod cache;
pub mod error;
pub mod session;
pub mod viewport;

#[cfg(feature = "http")]
pub mod http;

pub use cache::RequestCache;
pub use error::{ClientError, Result};
pub use session::{Session, WindowLoader};
pub use viewport::{LayerState, LayerView};

#[cfg(feature = "http")]
pub use http::HttpLoader;
