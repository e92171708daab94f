//! The nearby-accidents query.
//!
//! A query has three stages:
//!
//! 1. **Prepare**: attach coordinates to accident rows that only name a
//!    city ([`prepare_records`]). This does not depend on the query, so an
//!    interactive session does it once.
//! 2. **Locate**: geocode the region the user typed ([`locate_reference`]),
//!    or take explicit coordinates.
//! 3. **Filter**: keep accidents within the radius, nearest first, or the
//!    placeholder row when there are none ([`find_nearby`]).

use std::path::{Path, PathBuf};

use accident_map_accident_models::{AccidentRecord, ReferencePoint};
use accident_map_coordinates::CoordinateTable;
use accident_map_coordinates_models::GeoPoint;
use accident_map_dataset::merge::{MergeOptions, MergeSummary, merge_coordinates};
use accident_map_dataset::paths;
use accident_map_geocoder::nominatim::RegionGeocoder;
use accident_map_geocoder::{GeocodeError, service_registry};
use accident_map_proximity::{DEFAULT_RADIUS_KM, ProximityResult, nearby_or_placeholder};

use crate::render;

/// Settings for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    /// Search radius in kilometers (inclusive).
    pub radius_km: f64,
    /// How accident city names are resolved to coordinates.
    pub merge: MergeOptions,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            merge: MergeOptions::default(),
        }
    }
}

/// Everything a query produced, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Where the search was centered.
    pub reference: ReferencePoint,
    /// Radius used for the search.
    pub radius_km: f64,
    /// Nearby accidents or the placeholder row.
    pub result: ProximityResult,
}

/// Attaches coordinates to rows that lack them.
#[must_use]
pub fn prepare_records(
    records: Vec<AccidentRecord>,
    table: &CoordinateTable,
    merge: &MergeOptions,
) -> (Vec<AccidentRecord>, MergeSummary) {
    merge_coordinates(records, table, merge)
}

/// Filters already-prepared records around `reference`.
#[must_use]
pub fn find_nearby(
    records: &[AccidentRecord],
    reference: ReferencePoint,
    radius_km: f64,
) -> QueryOutcome {
    let result = nearby_or_placeholder(&reference, records, radius_km);
    QueryOutcome {
        reference,
        radius_km,
        result,
    }
}

/// Prepares `records` and filters them around `reference` in one go.
#[must_use]
pub fn run_query(
    records: Vec<AccidentRecord>,
    table: &CoordinateTable,
    reference: ReferencePoint,
    options: &QueryOptions,
) -> QueryOutcome {
    let (prepared, _) = prepare_records(records, table, &options.merge);
    find_nearby(&prepared, reference, options.radius_km)
}

/// Geocodes a region name into a reference point.
///
/// Returns `Ok(None)` when the geocoder has no match for the region.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the geocoding service is unreachable or
/// answers with something unparseable.
pub async fn locate_reference(
    geocoder: &RegionGeocoder,
    region: &str,
) -> Result<Option<ReferencePoint>, GeocodeError> {
    let Some(found) = geocoder.locate(region).await? else {
        return Ok(None);
    };

    if let Some(name) = &found.display_name {
        log::info!("Resolved {region:?} to {name}");
    }
    Ok(Some(ReferencePoint::new(region.trim(), found.point())))
}

/// Builds the geocoder from the highest-priority configured service.
///
/// # Errors
///
/// Returns [`GeocodeError`] if no service is enabled or the HTTP client
/// cannot be built.
pub fn default_geocoder() -> Result<RegionGeocoder, GeocodeError> {
    RegionGeocoder::from_service(&service_registry::primary_service()?)
}

/// Picks the coordinate table to query against: the cleaned table when it
/// exists, otherwise the raw extraction output.
#[must_use]
pub fn default_coordinates_path() -> PathBuf {
    let cleaned = paths::cleaned_coordinates_path();
    if cleaned.exists() {
        cleaned
    } else {
        paths::city_coordinates_path()
    }
}

/// Arguments for a one-shot query from the command line.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Region the user typed.
    pub region: String,
    /// Explicit reference coordinate that skips geocoding.
    pub at: Option<GeoPoint>,
    /// Accident dataset CSV.
    pub accidents: PathBuf,
    /// Coordinate table CSV (raw or cleaned).
    pub coordinates: PathBuf,
    /// Query settings.
    pub options: QueryOptions,
    /// Where to write a `GeoJSON` export, if anywhere.
    pub geojson: Option<PathBuf>,
}

impl QueryRequest {
    /// A request for `region` with default paths and settings.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            at: None,
            accidents: paths::accidents_path(),
            coordinates: default_coordinates_path(),
            options: QueryOptions::default(),
            geojson: None,
        }
    }
}

/// Runs a one-shot query: load both datasets, locate the region, filter,
/// print the table, and optionally export `GeoJSON`.
///
/// A region the geocoder cannot find is reported and ends the query
/// without an error.
///
/// # Errors
///
/// Returns an error if either dataset is missing or unreadable, the
/// geocoding service fails, or the export cannot be written.
pub async fn execute(request: &QueryRequest) -> Result<(), Box<dyn std::error::Error>> {
    let records = accident_map_dataset::load_accidents(&request.accidents)?;
    let table = accident_map_coordinates::load_table(&request.coordinates)?;

    let reference = if let Some(at) = request.at {
        ReferencePoint::new(request.region.trim(), at)
    } else {
        let geocoder = default_geocoder()?;
        match locate_reference(&geocoder, &request.region).await {
            Ok(Some(reference)) => reference,
            Ok(None) => {
                println!("Cannot find coordinates for: {}", request.region);
                return Ok(());
            }
            Err(e) => {
                log::error!("Error fetching location coordinates: {e}");
                return Err(e.into());
            }
        }
    };

    let outcome = run_query(records, &table, reference, &request.options);
    print_outcome(&outcome);

    if let Some(path) = &request.geojson {
        export_geojson(&outcome, path)?;
    }

    Ok(())
}

/// Prints the result table with a heading.
pub fn print_outcome(outcome: &QueryOutcome) {
    if outcome.result.is_placeholder {
        println!("No accident spots found within {} km.", outcome.radius_km);
    }
    println!(
        "Accident data within {} km of {} ({:.4}, {:.4})",
        outcome.radius_km,
        outcome.reference.region_name,
        outcome.reference.location.latitude,
        outcome.reference.location.longitude
    );
    println!();
    print!("{}", render::format_table(&outcome.result));
}

/// Writes the outcome as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn export_geojson(outcome: &QueryOutcome, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        paths::ensure_dir(parent)?;
    }

    let collection = render::to_geojson(outcome);
    std::fs::write(path, serde_json::to_string_pretty(&collection)?)?;
    log::info!(
        "Exported {} features to {}",
        outcome.result.rows.len() + 1,
        path.display()
    );
    Ok(())
}
