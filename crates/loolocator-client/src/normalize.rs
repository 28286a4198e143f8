//! Normalization of directory wire records into [`WashroomRecord`] values.
//!
//! A record that fails validation is dropped with a warning instead of
//! failing the whole response, so one bad row never blanks the result list.

use std::collections::HashSet;

use loolocator_core::{Amenity, Coordinate, WashroomId, WashroomRecord};
use thiserror::Error;

use crate::types::WireWashroom;

/// Reason a wire record was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordRejected {
    #[error("record has an empty id")]
    EmptyId,
    #[error("location out of range: {0}")]
    Location(#[from] loolocator_core::InvalidCoordinate),
    #[error("rating {0} outside [0, 5]")]
    Rating(f64),
    #[error("distance {0} is negative or not a number")]
    Distance(f64),
}

/// Converts one wire record, computing the distance from `origin` when the
/// service did not send one.
///
/// # Errors
///
/// Returns [`RecordRejected`] when the record violates a field invariant.
pub fn normalize_record(
    wire: WireWashroom,
    origin: Option<&Coordinate>,
) -> Result<WashroomRecord, RecordRejected> {
    let id = wire.id.trim();
    if id.is_empty() {
        return Err(RecordRejected::EmptyId);
    }

    let location = Coordinate::new(wire.location.latitude, wire.location.longitude)?;

    if !(0.0..=5.0).contains(&wire.rating) {
        return Err(RecordRejected::Rating(wire.rating));
    }

    let distance_meters = match wire.distance {
        Some(d) if d.is_nan() || d < 0.0 => return Err(RecordRejected::Distance(d)),
        Some(d) => Some(d),
        None => origin.map(|o| o.distance_to(&location)),
    };

    let mut seen = HashSet::new();
    let amenities = wire
        .amenities
        .into_iter()
        .map(Amenity::from)
        .filter(|a| seen.insert(a.clone()))
        .collect();

    Ok(WashroomRecord {
        id: WashroomId::new(id),
        name: wire.name,
        address: wire.address,
        description: wire.description.filter(|d| !d.trim().is_empty()),
        location,
        rating: wire.rating,
        hours: wire.hours.unwrap_or_else(|| "24/7".to_string()),
        accessibility: wire.accessibility,
        verified: wire.verified,
        amenities,
        distance_meters,
    })
}

/// Converts a raw JSON array from the nearest endpoint, preserving order.
///
/// Entries that do not deserialize or fail validation are skipped, as are
/// repeated ids (the first occurrence wins).
#[must_use]
pub fn normalize_records(
    items: Vec<serde_json::Value>,
    origin: Option<&Coordinate>,
) -> Vec<WashroomRecord> {
    let mut seen_ids = HashSet::new();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let wire = serde_json::from_value::<WireWashroom>(value)
                .map_err(|e| {
                    tracing::warn!(index, error = %e, "skipping malformed washroom record");
                })
                .ok()?;
            let wire_id = wire.id.clone();
            normalize_record(wire, origin)
                .map_err(|e| {
                    tracing::warn!(index, id = %wire_id, error = %e, "skipping invalid washroom record");
                })
                .ok()
        })
        .filter(|record| {
            let fresh = seen_ids.insert(record.id.clone());
            if !fresh {
                tracing::warn!(id = %record.id, "skipping duplicate washroom id");
            }
            fresh
        })
        .collect()
}
