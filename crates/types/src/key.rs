use crate::bbox::QuantizedBounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one window query: dataset, optional containment dataset,
/// and the quantized window.
///
/// Equal keys map to equal results for as long as the datasets do not
/// change, which is what makes the key usable on both sides of the wire:
/// the server's result cache and the client's request cache agree on what
/// "the same query" means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    dataset: String,
    within: Option<String>,
    bounds: QuantizedBounds,
}

impl QueryKey {
    pub fn new(dataset: impl Into<String>, within: Option<&str>, bounds: QuantizedBounds) -> Self {
        Self {
            dataset: dataset.into(),
            within: within.map(str::to_string),
            bounds,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn within(&self) -> Option<&str> {
        self.within.as_deref()
    }

    pub fn bounds(&self) -> QuantizedBounds {
        self.bounds
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.within {
            Some(within) => write!(f, "{}|{}@{}", self.dataset, within, self.bounds),
            None => write!(f, "{}@{}", self.dataset, self.bounds),
        }
    }
}
