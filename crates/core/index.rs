//! R-tree spatial index over the features of one dataset.
//!
//! The index stores one envelope per feature, keyed by the feature's
//! position in the backing file. Candidate retrieval walks the tree with
//! AABB envelope intersection and returns positions in ascending order, so
//! downstream consumers see features in file order regardless of how the
//! tree was packed.

use areal_types::FeatureCollection;
use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};

/// Envelope of a single feature, indexed by file position.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEnvelope {
    /// Position of the feature in the source collection
    pub position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Bulk-loaded R-tree over feature envelopes.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<FeatureEnvelope>,
    len: usize,
    excluded: usize,
}

impl SpatialIndex {
    /// Build an index over every feature in the collection.
    ///
    /// Features without a computable extent (empty geometry) are left out
    /// of the tree and counted in [`SpatialIndex::excluded`].
    pub fn build(collection: &FeatureCollection) -> Self {
        let mut excluded = 0;
        let envelopes: Vec<FeatureEnvelope> = collection
            .iter()
            .enumerate()
            .filter_map(|(position, feature)| match feature.geometry.bounding_rect() {
                Some(rect) => Some(FeatureEnvelope {
                    position,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                }),
                None => {
                    excluded += 1;
                    log::warn!("feature {} has no extent, excluded from index", position);
                    None
                }
            })
            .collect();

        let len = envelopes.len();
        Self {
            tree: RTree::bulk_load(envelopes),
            len,
            excluded,
        }
    }

    /// Positions of features whose envelope intersects the query window,
    /// in ascending file order.
    pub fn candidates(&self, window: &Rect<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [window.min().x, window.min().y],
            [window.max().x, window.max().y],
        );
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Number of indexed features.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of features left out for lack of an extent.
    pub fn excluded(&self) -> usize {
        self.excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use areal_types::Feature;
    use geo::{MultiPolygon, polygon};

    fn unit_square(x: f64, y: f64) -> Feature {
        Feature::bare(polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ])
    }

    fn grid() -> FeatureCollection {
        // 3x1 strip of unit squares at x = 0, 2, 4
        [
            unit_square(0.0, 0.0),
            unit_square(2.0, 0.0),
            unit_square(4.0, 0.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_candidates_prune_by_envelope() {
        let index = SpatialIndex::build(&grid());
        assert_eq!(index.len(), 3);

        let window = Rect::new((1.5, 0.2), (2.5, 0.8));
        assert_eq!(index.candidates(&window), vec![1]);

        let wide = Rect::new((-1.0, -1.0), (10.0, 10.0));
        assert_eq!(index.candidates(&wide), vec![0, 1, 2]);

        let outside = Rect::new((10.0, 10.0), (11.0, 11.0));
        assert!(index.candidates(&outside).is_empty());
    }

    #[test]
    fn test_candidates_sorted_by_position() {
        // Spread squares so tree packing order differs from file order.
        let collection: FeatureCollection = [
            unit_square(90.0, 40.0),
            unit_square(-30.0, -10.0),
            unit_square(0.0, 0.0),
            unit_square(89.5, 39.5),
        ]
        .into_iter()
        .collect();
        let index = SpatialIndex::build(&collection);

        let everything = Rect::new((-50.0, -50.0), (100.0, 100.0));
        assert_eq!(index.candidates(&everything), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_envelope_hit_is_not_exact_hit() {
        // Window overlaps the envelope gap between squares: envelope test
        // still reports neighbors whose boxes touch the window.
        let index = SpatialIndex::build(&grid());
        let window = Rect::new((0.9, 0.1), (2.1, 0.9));
        assert_eq!(index.candidates(&window), vec![0, 1]);
    }

    #[test]
    fn test_empty_geometry_excluded() {
        let collection: FeatureCollection = [
            unit_square(0.0, 0.0),
            Feature::bare(MultiPolygon::<f64>(vec![])),
            unit_square(2.0, 0.0),
        ]
        .into_iter()
        .collect();
        let index = SpatialIndex::build(&collection);

        assert_eq!(index.len(), 2);
        assert_eq!(index.excluded(), 1);

        let wide = Rect::new((-1.0, -1.0), (10.0, 10.0));
        assert_eq!(index.candidates(&wide), vec![0, 2]);
    }

    #[test]
    fn test_empty_collection() {
        let index = SpatialIndex::build(&FeatureCollection::empty());
        assert!(index.is_empty());
        let window = Rect::new((0.0, 0.0), (1.0, 1.0));
        assert!(index.candidates(&window).is_empty());
    }
}
