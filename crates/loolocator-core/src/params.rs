//! Search filter values: radius and accessibility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidParameter {
    #[error("unsupported search radius {0}m (expected one of 500, 1000, 2000, 5000)")]
    Radius(u32),
}

/// One of the fixed search radii offered to the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum SearchRadius {
    Meters500,
    #[default]
    Meters1000,
    Meters2000,
    Meters5000,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 4] = [
        SearchRadius::Meters500,
        SearchRadius::Meters1000,
        SearchRadius::Meters2000,
        SearchRadius::Meters5000,
    ];

    #[must_use]
    pub fn meters(self) -> u32 {
        match self {
            SearchRadius::Meters500 => 500,
            SearchRadius::Meters1000 => 1000,
            SearchRadius::Meters2000 => 2000,
            SearchRadius::Meters5000 => 5000,
        }
    }

    /// Short label shown next to the radius picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SearchRadius::Meters500 => "0.5 km",
            SearchRadius::Meters1000 => "1 km",
            SearchRadius::Meters2000 => "2 km",
            SearchRadius::Meters5000 => "5 km",
        }
    }
}

impl TryFrom<u32> for SearchRadius {
    type Error = InvalidParameter;

    fn try_from(meters: u32) -> Result<Self, Self::Error> {
        SearchRadius::ALL
            .into_iter()
            .find(|r| r.meters() == meters)
            .ok_or(InvalidParameter::Radius(meters))
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        radius.meters()
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter state for a nearest search. Defaults to 1 km, any accessibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub radius: SearchRadius,
    pub accessibility_only: bool,
}

impl SearchParameters {
    /// Validates raw filter input.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParameter::Radius`] when `radius_meters` is not one of
    /// the offered radii. Values are never clamped.
    pub fn new(radius_meters: u32, accessibility_only: bool) -> Result<Self, InvalidParameter> {
        Ok(Self {
            radius: SearchRadius::try_from(radius_meters)?,
            accessibility_only,
        })
    }
}
