//! Core types for terramark

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Territory identifier - opaque, immutable, cheaply cloneable.
///
/// Assigned when the entity is created or loaded; never serialized. All
/// delete/lookup operations address territories by this handle, never by
/// position in the collection, so a handle captured before a mutation can
/// go stale but can never point at the wrong record.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TerritoryId(Arc<str>);

impl TerritoryId {
    pub fn generate() -> Self {
        Self(Arc::from(uuid::Uuid::new_v4().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TerritoryId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TerritoryId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

/// A geographic vertex. Serialized as a `[lat, lon]` pair to stay
/// compatible with existing export artifacts and remote payloads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(v: [f64; 2]) -> Self {
        Self { lat: v[0], lon: v[1] }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lon]
    }
}

/// Development status. Drives render color; unknown strings are accepted
/// by the persistence layer and round-trip unchanged via `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Ready,
    Building,
    Planned,
    Stopped,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Ready => "ready",
            Status::Building => "building",
            Status::Planned => "planned",
            Status::Stopped => "stopped",
            Status::Other(s) => s,
        }
    }

    /// Polygon fill color (rgba). `Other` gets a neutral gray so the
    /// render contract stays total.
    pub fn fill_color(&self) -> &'static str {
        match self {
            Status::Ready => "rgba(52, 152, 219, 0.6)",
            Status::Building => "rgba(241, 196, 15, 0.6)",
            Status::Planned => "rgba(46, 204, 113, 0.6)",
            Status::Stopped => "rgba(231, 76, 60, 0.6)",
            Status::Other(_) => "rgba(149, 165, 166, 0.6)",
        }
    }

    /// Polygon border color (hex).
    pub fn border_color(&self) -> &'static str {
        match self {
            Status::Ready => "#3498db",
            Status::Building => "#f39c12",
            Status::Planned => "#2ecc71",
            Status::Stopped => "#e74c3c",
            Status::Other(_) => "#95a5a6",
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ready" => Status::Ready,
            "building" => Status::Building,
            "planned" => Status::Planned,
            "stopped" => Status::Stopped,
            _ => Status::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Status::from(s.to_string())
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named polygonal development area with status and metadata.
///
/// Field names on the wire (`coordinates`, `floors`) match the artifacts
/// the original store produced, so old exports import cleanly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Territory {
    #[serde(skip)]
    pub id: TerritoryId,
    pub name: String,
    #[serde(rename = "coordinates")]
    pub boundary: Vec<GeoPoint>,
    pub price: String,
    pub status: Status,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "floors", default)]
    pub floor_info: String,
    #[serde(default)]
    pub developer: String,
}

impl Territory {
    /// Minimum vertex count for a valid boundary. The single predicate
    /// every capture-path check goes through.
    pub const MIN_BOUNDARY_POINTS: usize = 3;

    pub fn new(boundary: Vec<GeoPoint>, meta: TerritoryMeta) -> Self {
        Self {
            id: TerritoryId::generate(),
            name: meta.name,
            boundary,
            price: meta.price,
            status: meta.status,
            description: meta.description,
            floor_info: meta.floor_info,
            developer: meta.developer,
        }
    }
}

// The id is a process-local handle, not part of the record.
impl PartialEq for Territory {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.boundary == other.boundary
            && self.price == other.price
            && self.status == other.status
            && self.description == other.description
            && self.floor_info == other.floor_info
            && self.developer == other.developer
    }
}

/// The full ordered set of territories currently known to the system.
pub type Collection = Vec<Territory>;

/// Commit-form metadata supplied when a capture session becomes a territory.
#[derive(Clone, Debug)]
pub struct TerritoryMeta {
    pub name: String,
    pub price: String,
    pub status: Status,
    pub description: String,
    pub floor_info: String,
    pub developer: String,
}

impl TerritoryMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for TerritoryMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            status: Status::Building,
            description: String::new(),
            floor_info: String::new(),
            developer: String::new(),
        }
    }
}
