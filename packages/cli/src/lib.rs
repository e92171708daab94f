#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the regional accident hotspot finder.
//!
//! The binary exposes three offline coordinate steps (`extract`, `clean`,
//! `lookup`) and the nearby-accidents `query`. Run without a subcommand it
//! falls back to an interactive `dialoguer` menu.

pub mod interactive;
pub mod offline;
pub mod query;
pub mod render;

use std::path::PathBuf;

use accident_map_coordinates_models::{
    DEFAULT_MAX_SUGGESTIONS, DEFAULT_SUGGESTION_CUTOFF, FuzzyMatchConfig, GeoPoint,
};
use accident_map_dataset::merge::MergeOptions;
use accident_map_dataset::paths;
use accident_map_proximity::DEFAULT_RADIUS_KM;
use clap::Args;

use crate::query::{QueryOptions, QueryRequest};

/// Fuzzy "did you mean" settings shared by every command that looks up
/// city names.
#[derive(Debug, Clone, Copy, Args)]
pub struct FuzzyArgs {
    /// Minimum similarity (0.0 to 1.0) for a suggestion
    #[arg(long, default_value_t = DEFAULT_SUGGESTION_CUTOFF)]
    pub cutoff: f64,
    /// Maximum number of suggestions
    #[arg(long, default_value_t = DEFAULT_MAX_SUGGESTIONS)]
    pub max_suggestions: usize,
}

impl From<FuzzyArgs> for FuzzyMatchConfig {
    fn from(args: FuzzyArgs) -> Self {
        Self {
            cutoff: args.cutoff,
            max_suggestions: args.max_suggestions,
        }
    }
}

/// Arguments for `extract`.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Geonames tab-separated dump (defaults to `data/IN.txt`)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Output CSV (defaults to `data/city_coordinates.csv`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ExtractArgs {
    #[must_use]
    pub fn input(&self) -> PathBuf {
        self.input.clone().unwrap_or_else(paths::geonames_path)
    }

    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(paths::city_coordinates_path)
    }
}

/// Arguments for `clean`.
#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Extracted coordinate CSV (defaults to `data/city_coordinates.csv`)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Cleaned output CSV (defaults to `data/cleaned_city_coordinates.csv`)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// City name to look up once cleaning finishes
    #[arg(long)]
    pub sample: Option<String>,
    #[command(flatten)]
    pub fuzzy: FuzzyArgs,
}

impl CleanArgs {
    #[must_use]
    pub fn input(&self) -> PathBuf {
        self.input.clone().unwrap_or_else(paths::city_coordinates_path)
    }

    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(paths::cleaned_coordinates_path)
    }
}

/// Arguments for `lookup`.
#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    /// City names to look up
    #[arg(required = true)]
    pub names: Vec<String>,
    /// Coordinate CSV, raw or cleaned (defaults to the cleaned table when
    /// present)
    #[arg(long)]
    pub coordinates: Option<PathBuf>,
    #[command(flatten)]
    pub fuzzy: FuzzyArgs,
}

impl LookupArgs {
    #[must_use]
    pub fn coordinates(&self) -> PathBuf {
        self.coordinates
            .clone()
            .unwrap_or_else(query::default_coordinates_path)
    }
}

/// Arguments for `query`.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Region to search around (e.g., "Pune")
    pub region: String,
    /// Accident dataset CSV (defaults to `data/accident_prediction_india.csv`)
    #[arg(long)]
    pub accidents: Option<PathBuf>,
    /// Coordinate CSV, raw or cleaned (defaults to the cleaned table when
    /// present)
    #[arg(long)]
    pub coordinates: Option<PathBuf>,
    /// Search radius in kilometers
    #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
    pub radius_km: f64,
    /// Reference latitude; skips geocoding when given with `--lon`
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Reference longitude; skips geocoding when given with `--lat`
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Write the result as a `GeoJSON` `FeatureCollection` to this path
    #[arg(long)]
    pub geojson: Option<PathBuf>,
    /// Resolve unknown city names to their closest spelling
    #[arg(long)]
    pub accept_best_suggestion: bool,
    #[command(flatten)]
    pub fuzzy: FuzzyArgs,
}

impl From<QueryArgs> for QueryRequest {
    fn from(args: QueryArgs) -> Self {
        let at = match (args.lat, args.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };

        Self {
            region: args.region,
            at,
            accidents: args.accidents.unwrap_or_else(paths::accidents_path),
            coordinates: args
                .coordinates
                .unwrap_or_else(query::default_coordinates_path),
            options: QueryOptions {
                radius_km: args.radius_km,
                merge: MergeOptions {
                    fuzzy: args.fuzzy.into(),
                    accept_best_suggestion: args.accept_best_suggestion,
                },
            },
            geojson: args.geojson,
        }
    }
}
