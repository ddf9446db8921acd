use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content hash identifying a feature across repeated fetches.
///
/// Two features with the same geometry and the same properties produce the
/// same fingerprint, no matter which query window delivered them. Viewers
/// use this to merge overlapping window responses without rendering a
/// feature twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash arbitrary canonical bytes into a fingerprint.
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(digest.into())
    }

    /// Hash a feature's geometry and properties.
    ///
    /// The encoding is structural rather than textual: coordinates are fed
    /// to the hasher as IEEE-754 bit patterns and every variable-length
    /// section is length-prefixed, so equal content always collides and
    /// adjacent sections never bleed into each other. Property maps hash in
    /// sorted key order, which is the iteration order of
    /// `serde_json::Map`.
    pub fn of_feature(geometry: &Geometry, properties: &Map<String, Value>) -> Self {
        let mut hasher = Sha256::new();

        hasher.update([match geometry {
            Geometry::Polygon(_) => 1u8,
            Geometry::MultiPolygon(_) => 2u8,
        }]);
        hasher.update((geometry.polygons().len() as u64).to_be_bytes());
        for polygon in geometry.polygons() {
            hasher.update((polygon.interiors().len() as u64 + 1).to_be_bytes());
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors().iter()) {
                hasher.update((ring.0.len() as u64).to_be_bytes());
                for coord in &ring.0 {
                    hasher.update(coord.x.to_bits().to_be_bytes());
                    hasher.update(coord.y.to_bits().to_be_bytes());
                }
            }
        }

        hash_object(&mut hasher, properties);
        Self(hasher.finalize().into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

fn hash_object(hasher: &mut Sha256, object: &Map<String, Value>) {
    hasher.update([b'o']);
    hasher.update((object.len() as u64).to_be_bytes());
    for (key, value) in object {
        hasher.update((key.len() as u64).to_be_bytes());
        hasher.update(key.as_bytes());
        hash_value(hasher, value);
    }
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([b'n']),
        Value::Bool(b) => hasher.update([b'b', u8::from(*b)]),
        Value::Number(n) => {
            hasher.update([b'd']);
            let text = n.to_string();
            hasher.update((text.len() as u64).to_be_bytes());
            hasher.update(text.as_bytes());
        }
        Value::String(s) => {
            hasher.update([b's']);
            hasher.update((s.len() as u64).to_be_bytes());
            hasher.update(s.as_bytes());
        }
        Value::Array(items) => {
            hasher.update([b'a']);
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Object(object) => hash_object(hasher, object),
    }
}
