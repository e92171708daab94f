#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident dataset access.
//!
//! Loads the accident CSV into [`AccidentRecord`]s with every missing
//! categorical value set to `"Unknown"`, and fills in coordinates for rows
//! that only name a city (see [`merge`]).

pub mod accidents;
pub mod merge;
pub mod paths;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use accident_map_accident_models::AccidentRecord;

/// Errors from loading the accident dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file does not exist.
    #[error("Accident dataset not found: {0}")]
    NotFound(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads the accident dataset from `path`.
///
/// # Errors
///
/// Returns [`DatasetError::NotFound`] if the file is missing, or another
/// [`DatasetError`] if it cannot be read as CSV.
pub fn load_accidents(path: &Path) -> Result<Vec<AccidentRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    let records = accidents::read_accidents(BufReader::new(File::open(path)?))?;
    let located = records.iter().filter(|r| r.location.is_some()).count();
    log::info!(
        "Loaded {} accident records from {} ({located} with coordinates)",
        records.len(),
        path.display()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dataset_is_not_found() {
        let err = load_accidents(Path::new("/no/such/accident_prediction_india.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }
}
