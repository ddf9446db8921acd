use geo::{BoundingRect, Intersects, LineString, MultiPolygon, Polygon, Rect};
use std::fmt;

/// A polygonal geometry, either a single polygon or a multi-polygon.
///
/// Regional datasets mix the two shapes freely (a coastal district is
/// often a multi-polygon while its neighbours are plain polygons), so all
/// intersection, indexing and simplification code is written once against
/// this variant instead of special-casing the shape at every call site.
///
/// # Examples
///
/// ```
/// use areal_types::geometry::Geometry;
/// use geo::polygon;
///
/// let area = Geometry::from(polygon![
///     (x: 0.0, y: 0.0),
///     (x: 4.0, y: 0.0),
///     (x: 4.0, y: 4.0),
///     (x: 0.0, y: 4.0),
/// ]);
/// assert_eq!(area.polygons().len(), 1);
/// assert_eq!(area.rings().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

/// Error for conversions from non-polygonal geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedGeometry(pub String);

impl fmt::Display for UnsupportedGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported geometry type: {}", self.0)
    }
}

impl std::error::Error for UnsupportedGeometry {}

impl Geometry {
    /// View the geometry as a uniform slice of polygons.
    ///
    /// A single polygon yields a one-element slice; a multi-polygon yields
    /// its parts in order.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(mp) => &mp.0,
        }
    }

    /// Iterate over every ring of every polygon, exteriors before the
    /// holes of the same polygon.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        self.polygons()
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors().iter()))
    }

    /// Total number of vertices across all rings.
    pub fn vertex_count(&self) -> usize {
        self.rings().map(|ring| ring.0.len()).sum()
    }

    /// Axis-aligned bounds of the geometry, `None` when it has no extent
    /// (an empty multi-polygon or a polygon with no coordinates).
    pub fn bounding_rect(&self) -> Option<Rect> {
        match self {
            Self::Polygon(p) => p.bounding_rect(),
            Self::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }

    /// Exact intersection test against another polygonal geometry.
    ///
    /// Boundary contact counts as an intersection, matching the usual
    /// GIS `intersects` predicate.
    pub fn intersects(&self, other: &Geometry) -> bool {
        match (self, other) {
            (Self::Polygon(a), Self::Polygon(b)) => a.intersects(b),
            (Self::Polygon(a), Self::MultiPolygon(b)) => a.intersects(b),
            (Self::MultiPolygon(a), Self::Polygon(b)) => a.intersects(b),
            (Self::MultiPolygon(a), Self::MultiPolygon(b)) => a.intersects(b),
        }
    }

    /// Exact intersection test against a rectangular window.
    pub fn intersects_rect(&self, window: &Rect) -> bool {
        match self {
            Self::Polygon(p) => p.intersects(window),
            Self::MultiPolygon(mp) => mp.intersects(window),
        }
    }

    /// Convert into the general `geo` geometry enum.
    pub fn into_geo(self) -> geo::Geometry {
        match self {
            Self::Polygon(p) => geo::Geometry::Polygon(p),
            Self::MultiPolygon(mp) => geo::Geometry::MultiPolygon(mp),
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Self::MultiPolygon(mp)
    }
}

impl TryFrom<geo::Geometry> for Geometry {
    type Error = UnsupportedGeometry;

    fn try_from(g: geo::Geometry) -> Result<Self, Self::Error> {
        match g {
            geo::Geometry::Polygon(p) => Ok(Self::Polygon(p)),
            geo::Geometry::MultiPolygon(mp) => Ok(Self::MultiPolygon(mp)),
            other => Err(UnsupportedGeometry(geometry_type_name(&other).to_string())),
        }
    }
}

fn geometry_type_name(g: &geo::Geometry) -> &'static str {
    match g {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
