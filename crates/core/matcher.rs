//! Cross-dataset matcher: assign every source feature one owner in a
//! target dataset.
//!
//! For each source feature, in source file order, the first target feature
//! (again in file order) whose geometry exactly intersects it wins. Source
//! features that intersect nothing are omitted from the output. The scan
//! is accelerated by the target's spatial index; candidate positions come
//! back in ascending order, so the first confirmed hit is also the first
//! in the file.

use crate::dataset::Dataset;
use serde::Serialize;

/// One resolved ownership pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub source_index: usize,
    pub target_index: usize,
    pub source_id: String,
    pub target_id: String,
}

/// Outcome of a full mapping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingReport {
    pub pairs: Vec<MatchPair>,
    /// Source features skipped for lack of a usable geometry
    pub skipped: usize,
}

/// Match every feature of `source` against `target`.
///
/// A source feature without a computable extent is skipped with a warning
/// and counted in the report; it never aborts the batch.
pub fn match_datasets(source: &Dataset, target: &Dataset) -> MappingReport {
    let index = target.index();
    let mut pairs = Vec::new();
    let mut skipped = 0;

    for (position, feature) in source.collection().iter().enumerate() {
        let Some(extent) = feature.geometry.bounding_rect() else {
            skipped += 1;
            log::warn!(
                "feature {} of dataset {} has no extent, skipped in mapping",
                position,
                source.name()
            );
            continue;
        };

        for candidate in index.candidates(&extent) {
            let Some(candidate_feature) = target.feature(candidate) else {
                continue;
            };
            if feature.geometry.intersects(&candidate_feature.geometry) {
                pairs.push(MatchPair {
                    source_index: position,
                    target_index: candidate,
                    source_id: source.feature_id(position),
                    target_id: target.feature_id(candidate),
                });
                break;
            }
        }
    }

    MappingReport { pairs, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use areal_types::{Feature, FeatureCollection};
    use geo::{MultiPolygon, polygon};

    fn square(x: f64, y: f64, side: f64) -> Feature {
        Feature::bare(polygon![
            (x: x, y: y),
            (x: x + side, y: y),
            (x: x + side, y: y + side),
            (x: x, y: y + side),
        ])
    }

    #[test]
    fn test_first_match_in_file_order_wins() {
        // Source square sits fully inside the first target and also
        // overlaps the second; the earlier target must win.
        let source = Dataset::from_collection(
            "plz",
            [square(4.0, 4.0, 4.0)].into_iter().collect(),
        );
        let target = Dataset::from_collection(
            "wahlkreise",
            [square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)]
                .into_iter()
                .collect(),
        );

        let report = match_datasets(&source, &target);
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.pairs[0].source_index, 0);
        assert_eq!(report.pairs[0].target_index, 0);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_unmatched_source_omitted() {
        let source = Dataset::from_collection(
            "plz",
            [square(0.0, 0.0, 1.0), square(100.0, 100.0, 1.0)]
                .into_iter()
                .collect(),
        );
        let target =
            Dataset::from_collection("wahlkreise", [square(0.5, 0.5, 1.0)].into_iter().collect());

        let report = match_datasets(&source, &target);
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.pairs[0].source_index, 0);
    }

    #[test]
    fn test_ids_use_declared_property() {
        let with_id = |id: &str, feature: Feature| feature.with_property("code", id);
        let source = Dataset::from_collection(
            "plz",
            [with_id("10115", square(0.0, 0.0, 1.0))].into_iter().collect(),
        )
        .with_id_property("code");
        let target = Dataset::from_collection(
            "wahlkreise",
            [with_id("75", square(0.0, 0.0, 5.0))].into_iter().collect(),
        )
        .with_id_property("code");

        let report = match_datasets(&source, &target);
        assert_eq!(report.pairs[0].source_id, "10115");
        assert_eq!(report.pairs[0].target_id, "75");
    }

    #[test]
    fn test_empty_geometry_skipped_not_fatal() {
        let empty = Feature::bare(MultiPolygon::<f64>(vec![]));
        let source = Dataset::from_collection(
            "plz",
            [square(0.0, 0.0, 1.0), empty, square(1.0, 1.0, 1.0)]
                .into_iter()
                .collect(),
        );
        let target =
            Dataset::from_collection("wahlkreise", [square(0.0, 0.0, 3.0)].into_iter().collect());

        let report = match_datasets(&source, &target);
        assert_eq!(report.pairs.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.pairs[1].source_index, 2);
    }

    #[test]
    fn test_envelope_overlap_without_geometry_overlap() {
        // Diagonal neighbors: envelopes of an L-shaped multipolygon and the
        // source square overlap, the geometries do not.
        let l_shape = Feature::bare(MultiPolygon(vec![
            polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ],
            polygon![
                (x: 1.0, y: 1.0),
                (x: 2.0, y: 1.0),
                (x: 2.0, y: 2.0),
                (x: 1.0, y: 2.0),
            ],
        ]));
        let source = Dataset::from_collection(
            "plz",
            [square(1.2, 0.2, 0.6)].into_iter().collect(),
        );
        let target = Dataset::from_collection("wahlkreise", [l_shape].into_iter().collect());

        let report = match_datasets(&source, &target);
        assert!(report.pairs.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_empty_inputs() {
        let source = Dataset::from_collection("plz", FeatureCollection::empty());
        let target = Dataset::from_collection("wahlkreise", FeatureCollection::empty());
        let report = match_datasets(&source, &target);
        assert!(report.pairs.is_empty());
        assert_eq!(report.skipped, 0);
    }
}
