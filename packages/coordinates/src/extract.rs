//! Extracts city coordinates from a geonames country dump.
//!
//! Geonames files (e.g. `IN.txt`) are tab-separated with no header row.
//! Column 2 is the ASCII place name and columns 4/5 are latitude and
//! longitude. Only rows whose coordinates are plain decimal numbers are
//! kept, names are trimmed, and repeated names keep their first row.

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::sync::{Arc, LazyLock};

use accident_map_coordinates_models::RawCityRow;
use regex::Regex;

use crate::CoordinatesError;
use crate::progress::ProgressCallback;

/// Column holding the ASCII place name.
const NAME_COLUMN: usize = 2;
/// Column holding the latitude.
const LATITUDE_COLUMN: usize = 4;
/// Column holding the longitude.
const LONGITUDE_COLUMN: usize = 5;

/// How many rows to read between progress updates.
const PROGRESS_STEP: u64 = 10_000;

/// A coordinate field must look like `-12`, `12` or `12.345`, nothing else.
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid regex"));

/// Counters from one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Rows read from the dump.
    pub rows_read: u64,
    /// Rows with too few columns.
    pub short_rows: u64,
    /// Rows whose latitude or longitude was not a plain decimal.
    pub invalid_coordinates: u64,
    /// Rows dropped because their trimmed name was already seen.
    pub duplicate_names: u64,
    /// Rows kept.
    pub rows_kept: u64,
}

/// Reads a geonames dump and returns one row per distinct city name.
///
/// # Errors
///
/// Returns [`CoordinatesError`] if the input cannot be read as
/// tab-separated records.
pub fn extract_city_rows(
    reader: impl Read,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<RawCityRow>, ExtractSummary), CoordinatesError> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut summary = ExtractSummary::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut rows = Vec::new();

    for result in tsv.records() {
        let record = result?;
        summary.rows_read += 1;
        if summary.rows_read.is_multiple_of(PROGRESS_STEP) {
            progress.inc(PROGRESS_STEP);
            progress.set_message(format!("{} cities kept", rows.len()));
        }

        let (Some(name), Some(lat), Some(lon)) = (
            record.get(NAME_COLUMN),
            record.get(LATITUDE_COLUMN),
            record.get(LONGITUDE_COLUMN),
        ) else {
            summary.short_rows += 1;
            continue;
        };

        let Some((latitude, longitude)) = parse_coordinate(lat, lon) else {
            log::trace!("rejecting {name:?}: coordinate {lat:?}, {lon:?}");
            summary.invalid_coordinates += 1;
            continue;
        };

        let name = name.trim();
        if !seen.insert(name.to_string()) {
            summary.duplicate_names += 1;
            continue;
        }

        rows.push(RawCityRow {
            city_name: name.to_string(),
            latitude,
            longitude,
        });
    }

    summary.rows_kept = rows.len() as u64;
    progress.inc(summary.rows_read % PROGRESS_STEP);
    progress.finish(format!(
        "extracted {} cities from {} rows",
        summary.rows_kept, summary.rows_read
    ));

    Ok((rows, summary))
}

/// Writes extracted rows as `city_coordinates.csv`.
///
/// # Errors
///
/// Returns [`CoordinatesError`] if serialization or flushing fails.
pub fn write_city_rows(rows: &[RawCityRow], writer: impl Write) -> Result<(), CoordinatesError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parses a latitude/longitude pair, accepting only strict decimals.
fn parse_coordinate(lat: &str, lon: &str) -> Option<(f64, f64)> {
    if !DECIMAL_RE.is_match(lat) || !DECIMAL_RE.is_match(lon) {
        return None;
    }
    Some((lat.parse().ok()?, lon.parse().ok()?))
}
