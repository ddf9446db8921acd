use crate::fingerprint::Fingerprint;
use crate::geometry::Geometry;
use serde_json::{Map, Value};
use std::fmt;

/// A polygonal feature: geometry plus free-form properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    /// Property map in sorted key order
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a feature from any polygonal geometry and a property map.
    pub fn new(geometry: impl Into<Geometry>, properties: Map<String, Value>) -> Self {
        Self {
            geometry: geometry.into(),
            properties,
        }
    }

    /// Create a feature without properties.
    pub fn bare(geometry: impl Into<Geometry>) -> Self {
        Self::new(geometry, Map::new())
    }

    /// Attach a property, consuming and returning the feature.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up a property value by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Look up a property and render it as text.
    ///
    /// Identifier properties appear as strings in some source files and as
    /// bare numbers in others; both forms are accepted.
    pub fn property_text(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Content hash over geometry and properties.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_feature(&self.geometry, &self.properties)
    }
}

/// An ordered sequence of features.
///
/// The order is the order of the backing file and is significant: the
/// cross-dataset matcher resolves ties by position, and repeated queries
/// must return features in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a collection from a feature vector, preserving its order.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the features in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Feature at a position, if in range.
    pub fn get(&self, position: usize) -> Option<&Feature> {
        self.features.get(position)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Error produced when reading features from GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// The input is not syntactically valid GeoJSON
    Parse(String),
    /// The document is valid GeoJSON but not a FeatureCollection
    NotACollection(String),
    /// A feature has no geometry member
    MissingGeometry,
    /// A feature's geometry is not polygonal
    UnsupportedGeometry(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid GeoJSON: {}", msg),
            Self::NotACollection(kind) => {
                write!(f, "expected a FeatureCollection, got {}", kind)
            }
            Self::MissingGeometry => write!(f, "feature has no geometry"),
            Self::UnsupportedGeometry(kind) => {
                write!(f, "feature geometry must be polygonal, got {}", kind)
            }
        }
    }
}

impl std::error::Error for FeatureError {}

#[cfg(feature = "geojson")]
mod convert {
    use super::*;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl TryFrom<geojson::Feature> for Feature {
        type Error = FeatureError;

        fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
            let geometry = feature.geometry.ok_or(FeatureError::MissingGeometry)?;
            let geo_geometry = geo::Geometry::try_from(geometry.value)
                .map_err(|e| FeatureError::Parse(e.to_string()))?;
            let geometry = Geometry::try_from(geo_geometry)
                .map_err(|e| FeatureError::UnsupportedGeometry(e.0))?;
            Ok(Self {
                geometry,
                properties: feature.properties.unwrap_or_default(),
            })
        }
    }

    impl From<&Feature> for geojson::Feature {
        fn from(feature: &Feature) -> Self {
            let value = match &feature.geometry {
                Geometry::Polygon(p) => geojson::Value::from(p),
                Geometry::MultiPolygon(mp) => geojson::Value::from(mp),
            };
            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(value)),
                id: None,
                properties: Some(feature.properties.clone()),
                foreign_members: None,
            }
        }
    }

    impl FeatureCollection {
        /// Parse a GeoJSON FeatureCollection document.
        ///
        /// # Errors
        ///
        /// Fails when the input is not valid GeoJSON, is not a
        /// FeatureCollection, or contains a feature whose geometry is
        /// missing or not polygonal.
        pub fn from_geojson_str(input: &str) -> Result<Self, FeatureError> {
            let document: geojson::GeoJson = input
                .parse()
                .map_err(|e: geojson::Error| FeatureError::Parse(e.to_string()))?;
            let collection = match document {
                geojson::GeoJson::FeatureCollection(fc) => fc,
                geojson::GeoJson::Feature(_) => {
                    return Err(FeatureError::NotACollection("Feature".to_string()));
                }
                geojson::GeoJson::Geometry(_) => {
                    return Err(FeatureError::NotACollection("Geometry".to_string()));
                }
            };
            collection
                .features
                .into_iter()
                .map(Feature::try_from)
                .collect()
        }

        /// Convert to the GeoJSON representation for transmission.
        pub fn to_geojson(&self) -> geojson::FeatureCollection {
            geojson::FeatureCollection {
                bbox: None,
                features: self.iter().map(geojson::Feature::from).collect(),
                foreign_members: None,
            }
        }
    }

    impl Serialize for Feature {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            geojson::Feature::from(self).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Feature {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let feature = geojson::Feature::deserialize(deserializer)?;
            Self::try_from(feature).map_err(D::Error::custom)
        }
    }

    impl Serialize for FeatureCollection {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_geojson().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for FeatureCollection {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let collection = geojson::FeatureCollection::deserialize(deserializer)?;
            collection
                .features
                .into_iter()
                .map(|f| Feature::try_from(f).map_err(D::Error::custom))
                .collect()
        }
    }
}
