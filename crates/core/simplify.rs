//! Vertex reduction for outgoing geometries.
//!
//! Results are simplified with Douglas-Peucker before transmission so that
//! map-scale rendering does not pay for survey-grade vertex counts. The
//! tolerance is a tunable constant, not a contract. Rings that would
//! collapse below a valid closed ring are kept in their original form
//! (exteriors) or dropped (interiors), so the output stays usable for
//! point-in-polygon tests.

use areal_types::{Feature, Geometry};
use geo::{LineString, MultiPolygon, Polygon, Simplify};

/// A closed ring needs at least four coordinates (three distinct plus the
/// closing repeat).
const MIN_CLOSED_RING: usize = 4;

/// Simplify a feature's geometry, leaving its properties untouched.
pub fn simplify_feature(feature: &Feature, tolerance: f64) -> Feature {
    Feature {
        geometry: simplify_geometry(&feature.geometry, tolerance),
        properties: feature.properties.clone(),
    }
}

/// Simplify a geometry under the given tolerance.
///
/// A non-positive tolerance disables simplification and returns the
/// geometry unchanged.
pub fn simplify_geometry(geometry: &Geometry, tolerance: f64) -> Geometry {
    if tolerance <= 0.0 {
        return geometry.clone();
    }
    match geometry {
        Geometry::Polygon(polygon) => Geometry::Polygon(simplify_polygon(polygon, tolerance)),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon(
            mp.0
                .iter()
                .map(|polygon| simplify_polygon(polygon, tolerance))
                .collect(),
        )),
    }
}

fn simplify_polygon(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    let exterior = polygon.exterior().simplify(tolerance);
    if exterior.0.len() < MIN_CLOSED_RING {
        // The whole shell degenerated; the original is the only valid answer.
        return polygon.clone();
    }
    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .map(|ring| ring.simplify(tolerance))
        .filter(|ring| ring.0.len() >= MIN_CLOSED_RING)
        .collect();
    Polygon::new(exterior, interiors)
}
