//! Error taxonomy for the areal engine.
//!
//! Every operation classifies its failures into four kinds: the request
//! was malformed (`InvalidArgument`), the named thing does not exist
//! (`NotFound`), a backing file exists but cannot be used (`DataCorrupt`),
//! or the engine itself misbehaved (`Internal`). The first two are caused
//! by the caller and never retried; `DataCorrupt` is not retried within a
//! request either, since the input is static, but the registry keeps the
//! dataset unloaded so a later request attempts a fresh load once an
//! operator has fixed the file.

use areal_types::bbox::BboxError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ArealError>;

#[derive(Debug, Error)]
pub enum ArealError {
    /// The request is malformed (bad bbox, missing selector, bad config)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The named dataset or file does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A backing file exists but is not valid polygon data
    #[error("corrupt dataset file {}: {reason}", path.display())]
    DataCorrupt { path: PathBuf, reason: String },

    /// Unexpected failure inside index or intersection logic
    #[error("internal error: {0}")]
    Internal(String),
}

impl ArealError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn data_corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<BboxError> for ArealError {
    fn from(err: BboxError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
