//! Text and `GeoJSON` rendering of query results.

use std::fmt::Write as _;

use accident_map_accident_models::{AccidentField, CITY_NAME_COLUMN, STATE_NAME_COLUMN};
use accident_map_coordinates::CityLookup;
use accident_map_proximity::ProximityResult;

use crate::query::QueryOutcome;

/// Header of the distance column.
const DISTANCE_COLUMN: &str = "Distance_km";

/// Formats result rows as an aligned text table.
///
/// Columns: city, state, the summary categorical fields, distance in
/// kilometers with two decimals.
#[must_use]
pub fn format_table(result: &ProximityResult) -> String {
    let mut headers: Vec<&str> = vec![CITY_NAME_COLUMN, STATE_NAME_COLUMN];
    headers.extend(AccidentField::summary_columns().iter().map(AsRef::as_ref));
    headers.push(DISTANCE_COLUMN);

    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|nearby| {
            let record = &nearby.record;
            let mut cells = vec![record.city_name.clone(), record.state_name.clone()];
            cells.extend(
                AccidentField::summary_columns()
                    .iter()
                    .map(|f| record.field(*f).to_string()),
            );
            cells.push(format!("{:.2}", nearby.distance_km));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    push_line(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Builds a `GeoJSON` `FeatureCollection` of the result rows plus the
/// reference point.
///
/// Positions are written `[longitude, latitude]` as `GeoJSON` requires.
#[must_use]
pub fn to_geojson(outcome: &QueryOutcome) -> serde_json::Value {
    let mut features: Vec<serde_json::Value> = outcome
        .result
        .rows
        .iter()
        .map(|nearby| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [nearby.location.longitude, nearby.location.latitude]
                },
                "properties": {
                    "kind": if outcome.result.is_placeholder { "placeholder" } else { "accident" },
                    "city": nearby.record.city_name,
                    "state": nearby.record.state_name,
                    "severity": nearby.record.field(AccidentField::AccidentSeverity),
                    "distance_km": nearby.distance_km,
                }
            })
        })
        .collect();

    let reference = &outcome.reference;
    features.push(serde_json::json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [reference.location.longitude, reference.location.latitude]
        },
        "properties": {
            "kind": "reference",
            "region": reference.region_name,
            "radius_km": outcome.radius_km,
        }
    }));

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Describes a coordinate lookup the way the cleaning step reports it.
#[must_use]
pub fn describe_lookup(query: &str, lookup: &CityLookup<'_>) -> String {
    match lookup {
        CityLookup::Found(entry) => {
            let location = entry.location();
            format!(
                "{}: {:.6}, {:.6}",
                entry.name(),
                location.latitude,
                location.longitude
            )
        }
        CityLookup::Suggestions(suggestions) => {
            let names: Vec<String> = suggestions.iter().map(|s| format!("'{}'", s.name)).collect();
            format!("Cannot find '{query}'. Did you mean: {}?", names.join(", "))
        }
        CityLookup::NotFound => format!("Cannot find coordinates for: {query}"),
    }
}
