#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City coordinate types shared by the coordinate resolver, the accident
//! dataset loader, and the proximity filter.
//!
//! The row types mirror the CSV files produced by the offline extraction
//! and cleaning steps. The header names are fixed by those files, so the
//! serde renames here are the single source of truth for them.

use serde::{Deserialize, Serialize};

/// Default minimum similarity for a "did you mean" suggestion.
pub const DEFAULT_SUGGESTION_CUTOFF: f64 = 0.6;

/// Default maximum number of "did you mean" suggestions.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One row of `city_coordinates.csv`: a raw, possibly duplicated city
/// name with its coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCityRow {
    /// City name as it appears in the source.
    #[serde(rename = "City Name")]
    pub city_name: String,
    /// Latitude in degrees.
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// One row of `cleaned_city_coordinates.csv`.
///
/// Column order follows the cleaning step's output: normalized key first,
/// then the averaged coordinate, then the representative display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedCityRow {
    /// Normalized matching key.
    #[serde(rename = "City_norm")]
    pub city_norm: String,
    /// Mean latitude of every raw row sharing the key.
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    /// Mean longitude of every raw row sharing the key.
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// First-seen display name.
    #[serde(rename = "City Name")]
    pub city_name: String,
}

/// A "did you mean" candidate returned when a lookup has no exact hit.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySuggestion {
    /// Display name of the suggested city.
    pub name: String,
    /// Normalized key of the suggested city.
    pub key: String,
    /// Similarity ratio in `0.0..=1.0`.
    pub score: f64,
}

/// A set of raw rows that collapsed onto the same normalized key.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    /// Shared normalized key.
    pub key: String,
    /// Every contributing raw row, in input order.
    pub rows: Vec<RawCityRow>,
}

/// Settings for fuzzy "did you mean" matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatchConfig {
    /// Minimum similarity ratio a key must reach to be suggested.
    pub cutoff: f64,
    /// Maximum number of suggestions returned.
    pub max_suggestions: usize,
}

impl Default for FuzzyMatchConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_SUGGESTION_CUTOFF,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_defaults() {
        let config = FuzzyMatchConfig::default();
        assert!((config.cutoff - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.max_suggestions, 3);
    }

    #[test]
    fn geo_point_new() {
        let p = GeoPoint::new(18.5204, 73.8567);
        assert!((p.latitude - 18.5204).abs() < 1e-9);
        assert!((p.longitude - 73.8567).abs() < 1e-9);
    }
}
