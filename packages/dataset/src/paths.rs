//! Canonical file paths for the `data/` directory.
//!
//! All inputs and outputs live under the workspace root's `data/`
//! directory unless a command is given explicit paths.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// The accident dataset queried by default.
#[must_use]
pub fn accidents_path() -> PathBuf {
    data_dir().join("accident_prediction_india.csv")
}

/// The geonames country dump the extraction step reads.
#[must_use]
pub fn geonames_path() -> PathBuf {
    data_dir().join("IN.txt")
}

/// Raw `City Name, Latitude, Longitude` table written by extraction.
#[must_use]
pub fn city_coordinates_path() -> PathBuf {
    data_dir().join("city_coordinates.csv")
}

/// Deduplicated table written by the cleaning step.
#[must_use]
pub fn cleaned_coordinates_path() -> PathBuf {
    data_dir().join("cleaned_city_coordinates.csv")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
