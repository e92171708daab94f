#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius filtering of accident records around a reference point.
//!
//! A query is a linear scan: every record with a coordinate is measured
//! against the reference point with [`haversine::haversine`], records
//! within the radius are kept, and the survivors are sorted nearest first.
//! Datasets are a few thousand rows, so no spatial index is involved.

pub mod haversine;

use accident_map_accident_models::{AccidentRecord, NearbyAccident, ReferencePoint};
use accident_map_coordinates_models::GeoPoint;

use crate::haversine::distance_km;

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Rows to show for a query, plus whether they are real matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityResult {
    /// Nearby accidents nearest first, or the single placeholder row.
    pub rows: Vec<NearbyAccident>,
    /// `true` when nothing was in range and `rows` holds the placeholder.
    pub is_placeholder: bool,
}

/// Returns records within `radius_km` (inclusive) of `reference`, nearest
/// first.
///
/// Records without a location are skipped. Records at the same distance
/// keep their input order.
#[must_use]
pub fn filter_nearby(
    reference: GeoPoint,
    records: &[AccidentRecord],
    radius_km: f64,
) -> Vec<NearbyAccident> {
    let mut unlocated = 0usize;

    let mut nearby: Vec<NearbyAccident> = records
        .iter()
        .filter_map(|record| {
            let Some(location) = record.location else {
                unlocated += 1;
                return None;
            };
            let distance = distance_km(reference, location);
            (distance <= radius_km).then(|| NearbyAccident {
                record: record.clone(),
                location,
                distance_km: distance,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if unlocated > 0 {
        log::debug!("{unlocated} records have no coordinate and were skipped");
    }
    log::debug!(
        "{} of {} records within {radius_km} km",
        nearby.len(),
        records.len()
    );

    nearby
}

/// Runs [`filter_nearby`] and substitutes the "no nearby accidents"
/// placeholder when nothing is in range.
///
/// The placeholder sits on the reference point at distance 0.
#[must_use]
pub fn nearby_or_placeholder(
    reference: &ReferencePoint,
    records: &[AccidentRecord],
    radius_km: f64,
) -> ProximityResult {
    let rows = filter_nearby(reference.location, records, radius_km);
    if !rows.is_empty() {
        return ProximityResult {
            rows,
            is_placeholder: false,
        };
    }

    log::info!(
        "No accident spots found within {radius_km} km of {}",
        reference.region_name
    );

    ProximityResult {
        rows: vec![NearbyAccident {
            record: AccidentRecord::placeholder(reference),
            location: reference.location,
            distance_km: 0.0,
        }],
        is_placeholder: true,
    }
}
