//! Plain-text rendering of result lists and washroom cards.

use std::fmt::Write as _;

use loolocator_core::{format_distance, Amenity, SearchParameters, WashroomRecord};
use loolocator_engine::{ResultStatus, SearchState};

fn amenity_labels(amenities: &[Amenity]) -> String {
    amenities
        .iter()
        .map(Amenity::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn filter_summary(params: SearchParameters) -> String {
    if params.accessibility_only {
        format!("within {} (accessible only)", params.radius)
    } else {
        format!("within {}", params.radius)
    }
}

/// One line per result with a short second line for the address.
///
/// The selected record, if any, is marked with `>`.
pub(crate) fn result_list(state: &SearchState, params: SearchParameters) -> String {
    match state.status() {
        ResultStatus::Idle | ResultStatus::Loading => "Searching...".to_string(),
        ResultStatus::Error => state
            .error()
            .map_or_else(String::new, |failure| failure.message.clone()),
        ResultStatus::Success if state.records().is_empty() => {
            format!("No washrooms found {}.", filter_summary(params))
        }
        ResultStatus::Success => {
            let mut out = format!(
                "{} washroom(s) {}:\n",
                state.records().len(),
                filter_summary(params)
            );
            for (i, record) in state.records().iter().enumerate() {
                let marker = if state.selection() == Some(&record.id) {
                    '>'
                } else {
                    ' '
                };
                let distance = format_distance(record.distance_meters);
                let _ = writeln!(
                    out,
                    "{marker}{:>3}. {:<40} {:>8}  {:.1}/5{}",
                    i + 1,
                    record.name,
                    distance,
                    record.rating,
                    if record.verified { "  verified" } else { "" }
                );
                let _ = writeln!(out, "      {}", record.address);
            }
            out.trim_end().to_string()
        }
    }
}

/// Full card for a single washroom.
pub(crate) fn detail(record: &WashroomRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", record.name, record.id);
    let _ = writeln!(out, "Address: {}", record.address);
    if let Some(description) = &record.description {
        let _ = writeln!(out, "About: {description}");
    }
    let distance = format_distance(record.distance_meters);
    if !distance.is_empty() {
        let _ = writeln!(out, "Distance: {distance}");
    }
    let _ = writeln!(out, "Rating: {:.1}/5", record.rating);
    let _ = writeln!(out, "Hours: {}", record.hours);
    let _ = writeln!(
        out,
        "Wheelchair accessible: {}",
        if record.accessibility { "yes" } else { "no" }
    );
    if record.verified {
        let _ = writeln!(out, "Verified listing");
    }
    if !record.amenities.is_empty() {
        let _ = writeln!(out, "Amenities: {}", amenity_labels(&record.amenities));
    }
    let _ = write!(out, "Location: {}", record.location);
    out
}
