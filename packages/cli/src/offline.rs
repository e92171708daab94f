//! Offline coordinate steps: extract the geonames dump, clean the
//! extracted table, and look names up in it.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use accident_map_coordinates::extract::{ExtractSummary, extract_city_rows, write_city_rows};
use accident_map_coordinates::progress::ProgressCallback;
use accident_map_coordinates::{CoordinateTable, load_table, open_input, save_table};
use accident_map_coordinates_models::FuzzyMatchConfig;
use accident_map_dataset::paths;

use crate::render;

/// Extracts `City Name, Latitude, Longitude` rows from a geonames dump.
///
/// # Errors
///
/// Returns an error if the dump cannot be read or the output cannot be
/// written.
pub fn extract(
    input: &Path,
    output: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ExtractSummary, Box<dyn std::error::Error>> {
    log::info!("Extracting city coordinates from {}", input.display());
    let (rows, summary) = extract_city_rows(open_input(input)?, progress)?;

    ensure_parent(output)?;
    write_city_rows(&rows, File::create(output)?)?;

    log::info!(
        "Kept {} of {} rows ({} short, {} invalid coordinates, {} duplicate names)",
        summary.rows_kept,
        summary.rows_read,
        summary.short_rows,
        summary.invalid_coordinates,
        summary.duplicate_names
    );
    log::info!("Wrote {}", output.display());

    Ok(summary)
}

/// Loads the extracted table, reports duplicate groups, and writes the
/// deduplicated table.
///
/// When `sample` is given, its lookup outcome is printed afterwards.
///
/// # Errors
///
/// Returns an error if the input is missing or unreadable, or the output
/// cannot be written.
pub fn clean(
    input: &Path,
    output: &Path,
    sample: Option<&str>,
    fuzzy: &FuzzyMatchConfig,
) -> Result<CoordinateTable, Box<dyn std::error::Error>> {
    let table = load_table(input)?;
    report_duplicates(&table);

    ensure_parent(output)?;
    save_table(&table, output)?;

    if let Some(name) = sample {
        println!("{}", render::describe_lookup(name, &table.lookup(name, fuzzy)));
    }

    Ok(table)
}

/// Prints the lookup outcome for each name.
///
/// # Errors
///
/// Returns an error if the coordinate table cannot be loaded.
pub fn lookup(
    coordinates: &Path,
    names: &[String],
    fuzzy: &FuzzyMatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(coordinates)?;
    for name in names {
        println!("{}", render::describe_lookup(name, &table.lookup(name, fuzzy)));
    }
    Ok(())
}

fn report_duplicates(table: &CoordinateTable) {
    let groups = table.duplicates();
    if groups.is_empty() {
        log::info!("No duplicate city names");
        return;
    }

    log::info!("{} city names appear more than once", groups.len());
    for line in duplicate_lines(table) {
        log::info!("{line}");
    }
}

/// One line per duplicate group naming every conflicting row.
fn duplicate_lines(table: &CoordinateTable) -> Vec<String> {
    table
        .duplicates()
        .iter()
        .map(|group| {
            let rows: Vec<String> = group
                .rows
                .iter()
                .map(|row| format!("{} ({}, {})", row.city_name, row.latitude, row.longitude))
                .collect();
            format!("{:?}: {}", group.key, rows.join("; "))
        })
        .collect()
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => paths::ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use accident_map_coordinates::progress::null_progress;
    use accident_map_coordinates_models::RawCityRow;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "accident_map_offline_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn geonames_line(name: &str, lat: &str, lon: &str) -> String {
        format!("1\t{name}\t{name}\t\t{lat}\t{lon}\tP\tPPL\tIN\n")
    }

    #[test]
    fn extract_then_clean_merges_case_variants() {
        let dir = scratch_dir("pipeline");
        let dump = dir.join("IN.txt");
        let raw = dir.join("city_coordinates.csv");
        let cleaned = dir.join("out").join("cleaned_city_coordinates.csv");

        let mut text = String::new();
        text.push_str(&geonames_line("Raipur", "21.25", "81.63"));
        text.push_str(&geonames_line("RAIPUR", "21.27", "81.65"));
        text.push_str(&geonames_line("Pune", "18.52", "73.85"));
        text.push_str(&geonames_line("Nowhere", "north", "73.85"));
        text.push_str(&geonames_line("Pune", "18.60", "73.90"));
        std::fs::write(&dump, text).unwrap();

        let summary = extract(&dump, &raw, &null_progress()).unwrap();
        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.invalid_coordinates, 1);
        assert_eq!(summary.duplicate_names, 1);
        assert_eq!(summary.rows_kept, 3);

        let table = clean(&raw, &cleaned, Some("raipur"), &FuzzyMatchConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.duplicates().len(), 1);

        let raipur = table.get("Raipur").unwrap().location();
        assert!((raipur.latitude - 21.26).abs() < 1e-9);
        assert!((raipur.longitude - 81.64).abs() < 1e-9);

        let reloaded = load_table(&cleaned).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get("PUNE").is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn duplicate_lines_name_every_row() {
        let table = CoordinateTable::from_rows([
            RawCityRow {
                city_name: "Raipur".to_string(),
                latitude: 21.25,
                longitude: 81.63,
            },
            RawCityRow {
                city_name: "Pune".to_string(),
                latitude: 18.52,
                longitude: 73.85,
            },
            RawCityRow {
                city_name: "RAIPUR".to_string(),
                latitude: 21.27,
                longitude: 81.65,
            },
        ]);

        assert_eq!(
            duplicate_lines(&table),
            ["\"raipur\": Raipur (21.25, 81.63); RAIPUR (21.27, 81.65)"]
        );
    }

    #[test]
    fn clean_reports_missing_input() {
        let dir = scratch_dir("missing");
        let result = clean(
            &dir.join("absent.csv"),
            &dir.join("cleaned.csv"),
            None,
            &FuzzyMatchConfig::default(),
        );
        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
