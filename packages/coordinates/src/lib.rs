#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City coordinate resolution for accident records.
//!
//! Accident datasets name a city but often carry no coordinate. This crate
//! turns an independently sourced list of city coordinates into a lookup
//! that tolerates case, accent and spelling differences:
//!
//! 1. **Extraction** ([`extract`]) pulls name/latitude/longitude triples out
//!    of a geonames dump.
//! 2. **Cleaning** ([`table::CoordinateTable`]) groups rows by their
//!    [`normalize::normalize`]d name and averages each group.
//! 3. **Lookup** returns the averaged coordinate on an exact key hit, or
//!    ranked "did you mean" suggestions scored by [`similarity::ratio`].
//!
//! The table is built once and only read afterwards; pass it by reference
//! to whatever needs it.

pub mod extract;
pub mod normalize;
pub mod progress;
pub mod similarity;
pub mod table;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use table::{CityCoordinate, CityLookup, CoordinateTable};

/// Errors from coordinate extraction, loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatesError {
    /// The input file does not exist.
    #[error("Coordinate file not found: {0}")]
    NotFound(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Opens an input file, mapping a missing file to
/// [`CoordinatesError::NotFound`].
///
/// # Errors
///
/// Returns [`CoordinatesError`] if the file is missing or unreadable.
pub fn open_input(path: &Path) -> Result<BufReader<File>, CoordinatesError> {
    if !path.exists() {
        return Err(CoordinatesError::NotFound(path.display().to_string()));
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Loads a coordinate CSV (raw or cleaned) and builds the deduplicated
/// table.
///
/// # Errors
///
/// Returns [`CoordinatesError`] if the file is missing or not valid CSV.
pub fn load_table(path: &Path) -> Result<CoordinateTable, CoordinatesError> {
    let table = CoordinateTable::read_csv(open_input(path)?)?;
    log::info!(
        "Loaded {} coordinate rows from {} ({} unique cities)",
        table.raw_row_count(),
        path.display(),
        table.len()
    );
    Ok(table)
}

/// Writes the cleaned table to `path`.
///
/// # Errors
///
/// Returns [`CoordinatesError`] if the file cannot be created or written.
pub fn save_table(table: &CoordinateTable, path: &Path) -> Result<(), CoordinatesError> {
    table.write_csv(File::create(path)?)?;
    log::info!("Saved {} cleaned cities to {}", table.len(), path.display());
    Ok(())
}
