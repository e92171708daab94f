#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region name geocoding for accident hotspot queries.
//!
//! Turns the free-text region a user types ("Pune", "Kutch district") into
//! the single coordinate the proximity search is centered on. The lookup
//! goes to Nominatim / `OpenStreetMap`, configured by a TOML file in
//! `services/` (see [`service_registry`]).
//!
//! Whatever the service ranks first is taken as canonical; there is no
//! disambiguation between several places sharing a name, and no retry.

pub mod nominatim;
pub mod service_registry;

use accident_map_coordinates_models::GeoPoint;
use thiserror::Error;

/// A geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The matched place name returned by the geocoder.
    pub display_name: Option<String>,
}

impl GeocodedLocation {
    /// The coordinate as a [`GeoPoint`].
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// No enabled geocoding service is configured.
    #[error("No enabled geocoding service")]
    NotConfigured,
}
