//! Trip and photo records as they are held in memory and persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a trip. Trip and photo ids come from independent sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub u64);

/// Identifier of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A journey in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Creation time, never changed after the trip is added.
    pub date: DateTime<Utc>,
}

/// An image reference attached to exactly one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    pub trip_id: TripId,
    /// Opaque handle owned by the image subsystem.
    pub uri: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Geographic coordinate in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Which platform's map application a location link should open in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MapPlatform {
    #[default]
    Android,
    Ios,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Link that opens this point in the platform's map application.
    pub fn map_url(&self, platform: MapPlatform) -> String {
        let (lat, lon) = (self.latitude, self.longitude);
        match platform {
            MapPlatform::Ios => format!("maps:0,0?q={},{}", lat, lon),
            MapPlatform::Android => format!("geo:{},{}?q={},{}", lat, lon, lat, lon),
        }
    }
}

/// A photo that has been picked or taken but not yet added to a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub uri: String,
    pub description: String,
    pub location: Option<GeoPoint>,
}

impl NewPhoto {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            description: String::new(),
            location: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}
