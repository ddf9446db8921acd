use geo::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic axis-aligned bounding box.
///
/// Represents a rectangular viewport defined by its western, southern,
/// eastern and northern edges. This is a wrapper around `geo::Rect` with
/// additional functionality for parsing and grid quantization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

/// Error produced when parsing or validating a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum BboxError {
    /// The textual form did not have exactly four comma-separated components
    ComponentCount(usize),
    /// A component was not a finite number
    NotFinite(String),
    /// The west edge is not strictly below the east edge
    EmptyLonSpan { west: f64, east: f64 },
    /// The south edge is not strictly below the north edge
    EmptyLatSpan { south: f64, north: f64 },
}

impl fmt::Display for BboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentCount(n) => {
                write!(f, "bbox must be four comma-separated numbers, got {}", n)
            }
            Self::NotFinite(part) => write!(f, "bbox component '{}' is not a finite number", part),
            Self::EmptyLonSpan { west, east } => {
                write!(f, "bbox west ({}) must be less than east ({})", west, east)
            }
            Self::EmptyLatSpan { south, north } => {
                write!(f, "bbox south ({}) must be less than north ({})", south, north)
            }
        }
    }
}

impl std::error::Error for BboxError {}

impl BoundingBox {
    /// Create a new bounding box from its four edges.
    ///
    /// The underlying `geo::Rect` normalizes corner order, so a swapped
    /// pair of edges is reordered rather than preserved; textual parsing
    /// via [`FromStr`] rejects inverted input instead.
    ///
    /// # Arguments
    ///
    /// * `west` - Western edge (minimum longitude)
    /// * `south` - Southern edge (minimum latitude)
    /// * `east` - Eastern edge (maximum longitude)
    /// * `north` - Northern edge (maximum latitude)
    ///
    /// # Examples
    ///
    /// ```
    /// use areal_types::bbox::BoundingBox;
    ///
    /// let germany = BoundingBox::new(5.9, 47.3, 15.0, 55.1);
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: west, y: south },
                geo::coord! { x: east, y: north },
            ),
        }
    }

    /// Create a bounding box from a `geo::Rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Get the western edge (minimum longitude).
    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    /// Get the southern edge (minimum latitude).
    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    /// Get the eastern edge (maximum longitude).
    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    /// Get the northern edge (maximum latitude).
    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    /// Get the longitudinal span of the bounding box.
    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    /// Get the latitudinal span of the bounding box.
    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    /// Check that the box has finite edges and non-empty spans.
    ///
    /// # Errors
    ///
    /// Returns a [`BboxError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), BboxError> {
        for v in [self.west(), self.south(), self.east(), self.north()] {
            if !v.is_finite() {
                return Err(BboxError::NotFinite(v.to_string()));
            }
        }
        if self.west() >= self.east() {
            return Err(BboxError::EmptyLonSpan {
                west: self.west(),
                east: self.east(),
            });
        }
        if self.south() >= self.north() {
            return Err(BboxError::EmptyLatSpan {
                south: self.south(),
                north: self.north(),
            });
        }
        Ok(())
    }

    /// Check if this bounding box intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.east() < other.west()
            || self.west() > other.east()
            || self.north() < other.south()
            || self.south() > other.north())
    }

    /// Check if this bounding box fully contains another.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.west() <= other.west()
            && self.south() <= other.south()
            && self.east() >= other.east()
            && self.north() >= other.north()
    }

    /// Round the box outward onto the grid of the given digit precision.
    ///
    /// West and south are floored, east and north are ceiled, each after
    /// scaling by `10^digits`. The result therefore always contains the
    /// original box: no feature visible in the true viewport is ever lost
    /// to rounding, and nearby viewports collapse onto the same grid cell,
    /// which is what makes cache keys reusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use areal_types::bbox::BoundingBox;
    ///
    /// let bounds = BoundingBox::new(5.2, 47.9, 15.7, 54.9).quantize(0);
    /// assert_eq!(bounds.to_string(), "5,47,16,55");
    /// ```
    pub fn quantize(&self, digits: u8) -> QuantizedBounds {
        let scale = 10f64.powi(i32::from(digits));
        QuantizedBounds {
            west: (self.west() * scale).floor() as i64,
            south: (self.south() * scale).floor() as i64,
            east: (self.east() * scale).ceil() as i64,
            north: (self.north() * scale).ceil() as i64,
            digits,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.west(),
            self.south(),
            self.east(),
            self.north()
        )
    }
}

impl FromStr for BoundingBox {
    type Err = BboxError;

    /// Parse the `west,south,east,north` request form and validate it.
    ///
    /// Edge order is checked on the raw components, before construction
    /// normalizes the corners; an inverted request is an error, not a
    /// silently reordered box.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxError::ComponentCount(parts.len()));
        }
        let mut edges = [0f64; 4];
        for (slot, part) in edges.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| BboxError::NotFinite(part.to_string()))?;
            if !slot.is_finite() {
                return Err(BboxError::NotFinite(part.to_string()));
            }
        }
        let [west, south, east, north] = edges;
        if west >= east {
            return Err(BboxError::EmptyLonSpan { west, east });
        }
        if south >= north {
            return Err(BboxError::EmptyLatSpan { south, north });
        }
        Ok(Self::new(west, south, east, north))
    }
}

/// A bounding box snapped outward onto a fixed coordinate grid.
///
/// Edges are stored as integers scaled by `10^digits`, so the type is
/// `Eq + Hash` and safe to use inside cache keys; two viewports that
/// round to the same grid cell compare equal without any float fuzz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizedBounds {
    west: i64,
    south: i64,
    east: i64,
    north: i64,
    digits: u8,
}

impl QuantizedBounds {
    /// Digit precision the bounds were quantized at.
    pub fn digits(&self) -> u8 {
        self.digits
    }

    /// Convert back to a real-valued bounding box on the grid.
    pub fn to_bbox(&self) -> BoundingBox {
        let scale = 10f64.powi(i32::from(self.digits));
        BoundingBox::new(
            self.west as f64 / scale,
            self.south as f64 / scale,
            self.east as f64 / scale,
            self.north as f64 / scale,
        )
    }

    /// Convert to a `geo::Rect` for exact intersection tests.
    pub fn to_rect(&self) -> Rect {
        self.to_bbox().rect
    }
}

impl fmt::Display for QuantizedBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10f64.powi(i32::from(self.digits));
        let precision = usize::from(self.digits);
        write!(
            f,
            "{:.p$},{:.p$},{:.p$},{:.p$}",
            self.west as f64 / scale,
            self.south as f64 / scale,
            self.east as f64 / scale,
            self.north as f64 / scale,
            p = precision,
        )
    }
}
