//! Wire types for the directory service JSON API.
//!
//! These mirror the service payloads field-for-field. Conversion into
//! [`loolocator_core::WashroomRecord`] happens in [`crate::normalize`].

use serde::Deserialize;

/// Location object as sent by the service (plain lat/lng, not `GeoJSON`).
#[derive(Debug, Clone, Deserialize)]
pub struct WireLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A washroom object from `/api/washrooms/nearest` or `/api/washrooms/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireWashroom {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: WireLocation,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub accessibility: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Meters from the query origin. Absent on single-record lookups.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Body of `GET /api/maps/api-key`.
#[derive(Debug, Deserialize)]
pub(crate) struct MapKeyResponse {
    pub api_key: String,
}
