use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::RasterPayload;
use crate::error::ValidationError;
use crate::geo::GeoPoint;

/// Longest allowed landmark name, in characters after trimming
pub const MAX_NAME_CHARS: usize = 30;

/// Identifier assigned by the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(pub Uuid);

impl LandmarkId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated, trimmed landmark name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkName(String);

impl LandmarkName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong {
                len,
                max: MAX_NAME_CHARS,
            });
        }
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// What a save hands to persistence; the id is assigned there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLandmark {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub drawing_raster: RasterPayload,
}

impl NewLandmark {
    pub fn new(name: LandmarkName, location: GeoPoint, drawing_raster: RasterPayload) -> Self {
        Self {
            name: name.into_string(),
            lat: location.latitude,
            lng: location.longitude,
            drawing_raster,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// The record as persistence would return it under `id`
    pub fn into_stored(self, id: LandmarkId) -> StoredLandmark {
        StoredLandmark {
            id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            drawing_raster: self.drawing_raster,
        }
    }
}

/// A persisted landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLandmark {
    pub id: LandmarkId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub drawing_raster: RasterPayload,
}

impl StoredLandmark {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}
