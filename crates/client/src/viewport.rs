//! Additive per-layer accumulator for viewport results.
//!
//! Every window query returns the features visible in one window; panning
//! produces overlapping windows that return many of the same features
//! again. The accumulator keeps a fingerprint set of everything already
//! delivered and only appends the remainder, so the rendered collection
//! grows monotonically and never holds a feature twice.

use areal_types::{Feature, FeatureCollection, Fingerprint};
use rustc_hash::FxHashSet;

/// Whether a layer has received any data for its current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerState {
    #[default]
    Empty,
    Populated,
}

#[derive(Debug, Default)]
pub struct LayerView {
    seen: FxHashSet<Fingerprint>,
    rendered: Vec<Feature>,
    state: LayerState,
}

impl LayerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one window result into the layer.
    ///
    /// Features whose fingerprint is already present are dropped, the rest
    /// are appended in delivery order. Returns the number of features
    /// actually added. Any merge, even one that adds nothing, moves the
    /// layer to `Populated`; only [`reset`](Self::reset) moves it back.
    pub fn merge(&mut self, collection: &FeatureCollection) -> usize {
        let before = self.rendered.len();
        for feature in collection {
            if self.seen.insert(feature.fingerprint()) {
                self.rendered.push(feature.clone());
            }
        }
        self.state = LayerState::Populated;
        self.rendered.len() - before
    }

    /// Forget everything. Called when the dataset or the containment
    /// filter changes and the accumulated features no longer apply.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.rendered.clear();
        self.state = LayerState::Empty;
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    /// Features in the order they were first delivered.
    pub fn rendered(&self) -> &[Feature] {
        &self.rendered
    }

    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// True once the layer has seen this exact feature content.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }
}
