//! Washroom records as the rest of the application sees them.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Stable identifier assigned by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WashroomId(String);

impl WashroomId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WashroomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WashroomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Amenity tag. Unrecognised tags are kept verbatim in [`Amenity::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Amenity {
    WheelchairAccessible,
    BabyChanging,
    HandSanitizer,
    AirConditioning,
    OutdoorAccess,
    WaterFountain,
    Other(String),
}

impl Amenity {
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Amenity::WheelchairAccessible => "wheelchair_accessible",
            Amenity::BabyChanging => "baby_changing",
            Amenity::HandSanitizer => "hand_sanitizer",
            Amenity::AirConditioning => "air_conditioning",
            Amenity::OutdoorAccess => "outdoor_access",
            Amenity::WaterFountain => "water_fountain",
            Amenity::Other(tag) => tag,
        }
    }

    /// Human-readable label. Unknown tags are title-cased with `_` as spaces.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Amenity::WheelchairAccessible => "Wheelchair Accessible".to_string(),
            Amenity::BabyChanging => "Baby Changing Station".to_string(),
            Amenity::HandSanitizer => "Hand Sanitizer".to_string(),
            Amenity::AirConditioning => "Air Conditioning".to_string(),
            Amenity::OutdoorAccess => "Outdoor Access".to_string(),
            Amenity::WaterFountain => "Water Fountain".to_string(),
            Amenity::Other(tag) => tag
                .split('_')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_uppercase().chain(chars).collect::<String>()
                    })
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<String> for Amenity {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "wheelchair_accessible" => Amenity::WheelchairAccessible,
            "baby_changing" => Amenity::BabyChanging,
            "hand_sanitizer" => Amenity::HandSanitizer,
            "air_conditioning" => Amenity::AirConditioning,
            "outdoor_access" => Amenity::OutdoorAccess,
            "water_fountain" => Amenity::WaterFountain,
            _ => Amenity::Other(tag),
        }
    }
}

impl From<Amenity> for String {
    fn from(amenity: Amenity) -> Self {
        amenity.tag().to_string()
    }
}

/// A washroom returned by the directory service.
///
/// Records are read-only: a refresh replaces whole records and never patches
/// fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashroomRecord {
    pub id: WashroomId,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub location: Coordinate,
    /// Average rating in `[0, 5]`.
    pub rating: f64,
    pub hours: String,
    pub accessibility: bool,
    pub verified: bool,
    pub amenities: Vec<Amenity>,
    /// Distance from the search origin, when known.
    pub distance_meters: Option<f64>,
}

/// Formats a distance the way result cards show it: whole meters below 1 km,
/// otherwise kilometers with one decimal. Unknown or zero distance renders
/// empty.
#[must_use]
pub fn format_distance(distance_meters: Option<f64>) -> String {
    match distance_meters {
        None => String::new(),
        Some(d) if d == 0.0 || d.is_nan() => String::new(),
        Some(d) if d < 1000.0 => format!("{}m", d.round()),
        Some(d) => format!("{:.1}km", d / 1000.0),
    }
}
