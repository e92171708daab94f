#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record types and the categorical field taxonomy.
//!
//! Every categorical column in the accident dataset is represented by an
//! [`AccidentField`] variant whose string form is the CSV header name. A
//! missing value in any of these columns is stored as [`UNKNOWN`], so
//! consumers never have to deal with absent categorical data.

use std::collections::BTreeMap;

use accident_map_coordinates_models::GeoPoint;
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel for a missing categorical value.
pub const UNKNOWN: &str = "Unknown";

/// Marker for fields that do not apply (e.g. on the "no nearby accidents"
/// placeholder row).
pub const NOT_APPLICABLE: &str = "N/A";

/// Header of the city name column.
pub const CITY_NAME_COLUMN: &str = "City Name";

/// Header of the state name column.
pub const STATE_NAME_COLUMN: &str = "State Name";

/// Header of the latitude column.
pub const LATITUDE_COLUMN: &str = "Latitude";

/// Header of the longitude column.
pub const LONGITUDE_COLUMN: &str = "Longitude";

/// Categorical accident attributes.
///
/// The `Display`/`EnumString` form of each variant is the exact CSV header
/// used by the accident dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AccidentField {
    /// Whether the driver held a valid license
    #[strum(serialize = "Driver License Status")]
    DriverLicenseStatus,
    /// Whether alcohol was involved
    #[strum(serialize = "Alcohol Involvement")]
    AlcoholInvolvement,
    /// Highway, urban road, village road, ...
    #[strum(serialize = "Road Type")]
    RoadType,
    /// Dry, wet, under construction, ...
    #[strum(serialize = "Road Condition")]
    RoadCondition,
    /// Daylight, dusk, dark, ...
    #[strum(serialize = "Lighting Conditions")]
    LightingConditions,
    /// Signals, signs, police checkpoint, none
    #[strum(serialize = "Traffic Control Presence")]
    TrafficControlPresence,
    /// Clear, rainy, foggy, ...
    #[strum(serialize = "Weather Conditions")]
    WeatherConditions,
    /// Driver gender
    #[strum(serialize = "Driver Gender")]
    DriverGender,
    /// Minor, serious, fatal
    #[strum(serialize = "Accident Severity")]
    AccidentSeverity,
    /// Free-text location hint (intersection, curve, bridge, ...)
    #[strum(serialize = "Accident Location Details")]
    AccidentLocationDetails,
}

impl AccidentField {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DriverLicenseStatus,
            Self::AlcoholInvolvement,
            Self::RoadType,
            Self::RoadCondition,
            Self::LightingConditions,
            Self::TrafficControlPresence,
            Self::WeatherConditions,
            Self::DriverGender,
            Self::AccidentSeverity,
            Self::AccidentLocationDetails,
        ]
    }

    /// Columns shown in the nearby-accidents table, in display order.
    #[must_use]
    pub const fn summary_columns() -> &'static [Self] {
        &[
            Self::AccidentSeverity,
            Self::RoadType,
            Self::RoadCondition,
            Self::LightingConditions,
            Self::TrafficControlPresence,
        ]
    }
}

/// A single accident row.
///
/// `fields` always holds a value for every [`AccidentField`] once the row
/// has passed through the dataset loader; [`Self::field`] falls back to
/// [`UNKNOWN`] for rows built by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    /// City name as written in the dataset.
    pub city_name: String,
    /// State name as written in the dataset.
    pub state_name: String,
    /// Categorical attributes keyed by field.
    pub fields: BTreeMap<AccidentField, String>,
    /// Columns outside the known taxonomy, preserved in header order.
    pub extra: Vec<(String, String)>,
    /// Coordinate carried by the dataset or resolved from the city name.
    pub location: Option<GeoPoint>,
}

impl AccidentRecord {
    /// Creates a record with every categorical field set to [`UNKNOWN`] and
    /// no location.
    #[must_use]
    pub fn new(city_name: impl Into<String>, state_name: impl Into<String>) -> Self {
        Self {
            city_name: city_name.into(),
            state_name: state_name.into(),
            fields: AccidentField::all()
                .iter()
                .map(|f| (*f, UNKNOWN.to_string()))
                .collect(),
            extra: Vec::new(),
            location: None,
        }
    }

    /// Returns this record with the given location attached.
    #[must_use]
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns this record with one categorical field overwritten.
    #[must_use]
    pub fn with_field(mut self, field: AccidentField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Value of a categorical field, or [`UNKNOWN`] if absent.
    #[must_use]
    pub fn field(&self, field: AccidentField) -> &str {
        self.fields.get(&field).map_or(UNKNOWN, String::as_str)
    }

    /// The "your location, no nearby accidents" row placed at the
    /// reference point when a query finds nothing within its radius.
    #[must_use]
    pub fn placeholder(reference: &ReferencePoint) -> Self {
        Self {
            city_name: reference.region_name.clone(),
            state_name: UNKNOWN.to_string(),
            fields: AccidentField::all()
                .iter()
                .map(|f| (*f, NOT_APPLICABLE.to_string()))
                .collect(),
            extra: Vec::new(),
            location: Some(reference.location),
        }
    }
}

/// The geocoded location a query is centered on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    /// Region name as typed by the user.
    pub region_name: String,
    /// Resolved coordinate.
    pub location: GeoPoint,
}

impl ReferencePoint {
    /// Creates a reference point.
    #[must_use]
    pub fn new(region_name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            region_name: region_name.into(),
            location,
        }
    }
}

/// An accident annotated with its distance from the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyAccident {
    /// The accident row.
    pub record: AccidentRecord,
    /// Where the accident was placed for the distance computation.
    pub location: GeoPoint,
    /// Great-circle distance from the reference point in kilometers.
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn field_header_round_trip() {
        for field in AccidentField::all() {
            let header = field.to_string();
            assert_eq!(AccidentField::from_str(&header).unwrap(), *field);
        }
    }

    #[test]
    fn road_type_header() {
        assert_eq!(AccidentField::RoadType.as_ref(), "Road Type");
        assert_eq!(
            AccidentField::TrafficControlPresence.to_string(),
            "Traffic Control Presence"
        );
    }

    #[test]
    fn new_record_is_unknown_everywhere() {
        let record = AccidentRecord::new("Pune", "Maharashtra");
        for field in AccidentField::all() {
            assert_eq!(record.field(*field), UNKNOWN);
        }
        assert!(record.location.is_none());
    }

    #[test]
    fn missing_field_reads_unknown() {
        let mut record = AccidentRecord::new("Pune", "Maharashtra");
        record.fields.clear();
        assert_eq!(record.field(AccidentField::RoadType), UNKNOWN);
    }

    #[test]
    fn placeholder_sits_on_reference() {
        let reference = ReferencePoint::new("Nowhere", GeoPoint::new(10.0, 20.0));
        let row = AccidentRecord::placeholder(&reference);
        assert_eq!(row.city_name, "Nowhere");
        assert_eq!(row.state_name, UNKNOWN);
        assert_eq!(row.field(AccidentField::AccidentSeverity), NOT_APPLICABLE);
        assert_eq!(row.location, Some(GeoPoint::new(10.0, 20.0)));
    }
}
