//! Accident CSV loading.
//!
//! Rows are read by header name. Known categorical columns land in
//! [`AccidentRecord::fields`], `City Name`/`State Name` get their own
//! fields, `Latitude`/`Longitude` become the record's location when both
//! parse, and anything else is carried along in `extra`. Missing values in
//! categorical and name columns are filled with [`UNKNOWN`].

use std::io::Read;
use std::str::FromStr as _;

use accident_map_accident_models::{
    AccidentField, AccidentRecord, CITY_NAME_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN,
    STATE_NAME_COLUMN, UNKNOWN,
};
use accident_map_coordinates_models::GeoPoint;

use crate::DatasetError;

/// Cell values treated as missing, in addition to blank cells.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What a CSV column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    City,
    State,
    Latitude,
    Longitude,
    Field(AccidentField),
    Extra,
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header {
            CITY_NAME_COLUMN => Self::City,
            STATE_NAME_COLUMN => Self::State,
            LATITUDE_COLUMN => Self::Latitude,
            LONGITUDE_COLUMN => Self::Longitude,
            other => AccidentField::from_str(other).map_or(Self::Extra, Self::Field),
        }
    }
}

/// Reads accident rows from CSV.
///
/// # Errors
///
/// Returns [`DatasetError`] if the header row or any record cannot be read.
pub fn read_accidents(reader: impl Read) -> Result<Vec<AccidentRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    let columns: Vec<Column> = headers.iter().map(|h| Column::from_header(h)).collect();

    let has_coordinates =
        columns.contains(&Column::Latitude) && columns.contains(&Column::Longitude);
    if !has_coordinates && !columns.contains(&Column::City) {
        log::warn!("Accident dataset has neither coordinates nor a '{CITY_NAME_COLUMN}' column");
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;

        let mut record = AccidentRecord::new(UNKNOWN, UNKNOWN);
        let mut latitude = None;
        let mut longitude = None;

        for (i, column) in columns.iter().enumerate() {
            let raw = row.get(i).unwrap_or("");
            let value = present(raw);

            match column {
                Column::City => {
                    if let Some(v) = value {
                        record.city_name = v.to_owned();
                    }
                }
                Column::State => {
                    if let Some(v) = value {
                        record.state_name = v.to_owned();
                    }
                }
                Column::Latitude => latitude = value.and_then(parse_degrees),
                Column::Longitude => longitude = value.and_then(parse_degrees),
                Column::Field(field) => {
                    if let Some(v) = value {
                        record.fields.insert(*field, v.to_owned());
                    }
                }
                Column::Extra => record.extra.push((headers[i].clone(), raw.to_owned())),
            }
        }

        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            record.location = Some(GeoPoint::new(lat, lon));
        }

        records.push(record);
    }

    Ok(records)
}

/// Returns the trimmed value, or `None` for a missing cell.
fn present(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_degrees(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
