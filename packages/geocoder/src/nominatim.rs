//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance allows **1 request per second** and rejects
//! requests without an identifying `User-Agent`. One region lookup per
//! query stays far below that.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::service_registry::{GeocodingService, ProviderConfig};
use crate::{GeocodeError, GeocodedLocation};

/// A configured Nominatim client for one country.
#[derive(Debug, Clone)]
pub struct RegionGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_name: String,
    country_code: String,
}

impl RegionGeocoder {
    /// Builds a client from a service definition.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_service(service: &GeocodingService) -> Result<Self, GeocodeError> {
        let ProviderConfig::Nominatim {
            base_url,
            country_name,
            country_code,
            user_agent,
        } = &service.provider;

        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
            country_name: country_name.clone(),
            country_code: country_code.clone(),
        })
    }

    /// Geocodes `"<region>, <country>"` and returns the best match.
    ///
    /// A blank region resolves to `None` without a request.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request or response parsing
    /// fails.
    pub async fn locate(&self, region: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        let region = region.trim();
        if region.is_empty() {
            return Ok(None);
        }

        let query = region_query(region, &self.country_name);
        log::debug!("Geocoding {query:?}");
        geocode_freeform(&self.client, &self.base_url, &query, &self.country_code).await
    }
}

/// Builds the free-form query string for a region.
#[must_use]
pub fn region_query(region: &str, country_name: &str) -> String {
    format!("{}, {country_name}", region.trim())
}

/// Geocodes a free-form query using Nominatim, restricted to one country.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    country_code: &str,
) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("q", query),
            ("countrycodes", country_code),
            ("format", "jsonv2"),
            ("limit", "1"),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.error_for_status()?.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedLocation {
        latitude: lat,
        longitude: lon,
        display_name,
    }))
}
