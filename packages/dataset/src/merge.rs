//! Attaches coordinates to accident rows that lack them.
//!
//! Each row without a location is resolved through the
//! [`CoordinateTable`] by its city name. Lookups are cached per
//! normalized name since accident datasets repeat a small set of cities
//! thousands of times. Rows that cannot be resolved keep `location: None`
//! and are dropped later by the proximity filter.

use std::collections::BTreeMap;

use accident_map_accident_models::AccidentRecord;
use accident_map_coordinates::normalize::normalize;
use accident_map_coordinates::{CityLookup, CoordinateTable};
use accident_map_coordinates_models::{FuzzyMatchConfig, GeoPoint};

/// Options controlling how city names are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MergeOptions {
    /// Fuzzy matching settings used when there is no exact key.
    pub fuzzy: FuzzyMatchConfig,
    /// Use the top "did you mean" suggestion as the coordinate instead of
    /// leaving the row unresolved.
    pub accept_best_suggestion: bool,
}

/// Counters from one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Rows that already carried a coordinate.
    pub already_located: usize,
    /// Rows resolved by an exact normalized name.
    pub resolved_exact: usize,
    /// Rows resolved through the best fuzzy suggestion.
    pub resolved_fuzzy: usize,
    /// Rows left without a coordinate.
    pub unresolved: usize,
}

/// How a single city name resolved.
#[derive(Debug, Clone, Copy)]
enum Resolution {
    Exact(GeoPoint),
    Fuzzy(GeoPoint),
    Unresolved,
}

/// Returns the records with every resolvable missing coordinate filled in.
#[must_use]
pub fn merge_coordinates(
    records: Vec<AccidentRecord>,
    table: &CoordinateTable,
    options: &MergeOptions,
) -> (Vec<AccidentRecord>, MergeSummary) {
    let mut summary = MergeSummary::default();
    let mut cache: BTreeMap<String, Resolution> = BTreeMap::new();

    let merged = records
        .into_iter()
        .map(|mut record| {
            if record.location.is_some() {
                summary.already_located += 1;
                return record;
            }

            let key = normalize(&record.city_name);
            let resolution = *cache
                .entry(key)
                .or_insert_with(|| resolve(&record.city_name, table, options));

            match resolution {
                Resolution::Exact(location) => {
                    summary.resolved_exact += 1;
                    record.location = Some(location);
                }
                Resolution::Fuzzy(location) => {
                    summary.resolved_fuzzy += 1;
                    record.location = Some(location);
                }
                Resolution::Unresolved => summary.unresolved += 1,
            }
            record
        })
        .collect();

    log::info!(
        "Coordinates: {} carried, {} exact, {} fuzzy, {} unresolved",
        summary.already_located,
        summary.resolved_exact,
        summary.resolved_fuzzy,
        summary.unresolved
    );

    (merged, summary)
}

fn resolve(city_name: &str, table: &CoordinateTable, options: &MergeOptions) -> Resolution {
    match table.lookup(city_name, &options.fuzzy) {
        CityLookup::Found(entry) => Resolution::Exact(entry.location()),
        CityLookup::Suggestions(suggestions) if options.accept_best_suggestion => suggestions
            .first()
            .and_then(|best| table.get(&best.key))
            .map_or(Resolution::Unresolved, |entry| {
                log::debug!("Resolved {city_name:?} as {:?}", entry.name());
                Resolution::Fuzzy(entry.location())
            }),
        CityLookup::Suggestions(_) | CityLookup::NotFound => {
            log::debug!("No coordinate for {city_name:?}");
            Resolution::Unresolved
        }
    }
}

#[cfg(test)]
mod tests {
    use accident_map_coordinates_models::RawCityRow;

    use super::*;

    fn table() -> CoordinateTable {
        CoordinateTable::from_rows([
            RawCityRow {
                city_name: "Pune".to_string(),
                latitude: 18.5204,
                longitude: 73.8567,
            },
            RawCityRow {
                city_name: "Mumbai".to_string(),
                latitude: 19.0760,
                longitude: 72.8777,
            },
            RawCityRow {
                city_name: "Delhi".to_string(),
                latitude: 28.6139,
                longitude: 77.2090,
            },
        ])
    }

    #[test]
    fn resolves_by_normalized_name() {
        let records = vec![
            AccidentRecord::new("PUNE", "Maharashtra"),
            AccidentRecord::new(" mumbaí ", "Maharashtra"),
        ];
        let (merged, summary) = merge_coordinates(records, &table(), &MergeOptions::default());

        assert_eq!(merged[0].location, Some(GeoPoint::new(18.5204, 73.8567)));
        assert_eq!(merged[1].location, Some(GeoPoint::new(19.0760, 72.8777)));
        assert_eq!(summary.resolved_exact, 2);
    }

    #[test]
    fn keeps_existing_coordinates() {
        let here = GeoPoint::new(10.0, 10.0);
        let records = vec![AccidentRecord::new("Pune", "Maharashtra").with_location(here)];
        let (merged, summary) = merge_coordinates(records, &table(), &MergeOptions::default());

        assert_eq!(merged[0].location, Some(here));
        assert_eq!(summary.already_located, 1);
        assert_eq!(summary.resolved_exact, 0);
    }

    #[test]
    fn misspelling_stays_unresolved_by_default() {
        let records = vec![AccidentRecord::new("Dehli", "Delhi")];
        let (merged, summary) = merge_coordinates(records, &table(), &MergeOptions::default());

        assert!(merged[0].location.is_none());
        assert_eq!(summary.unresolved, 1);
    }

    #[test]
    fn misspelling_resolves_when_opted_in() {
        let records = vec![AccidentRecord::new("Dehli", "Delhi")];
        let options = MergeOptions {
            accept_best_suggestion: true,
            ..MergeOptions::default()
        };
        let (merged, summary) = merge_coordinates(records, &table(), &options);

        assert_eq!(merged[0].location, Some(GeoPoint::new(28.6139, 77.2090)));
        assert_eq!(summary.resolved_fuzzy, 1);
    }

    #[test]
    fn transposed_letters_resolve_when_opted_in() {
        let table = CoordinateTable::from_rows([RawCityRow {
            city_name: "Nagpur".to_string(),
            latitude: 21.1458,
            longitude: 79.0882,
        }]);
        let records = vec![AccidentRecord::new("Nargupr", "Maharashtra")];
        let options = MergeOptions {
            accept_best_suggestion: true,
            ..MergeOptions::default()
        };
        let (merged, summary) = merge_coordinates(records, &table, &options);

        assert_eq!(merged[0].location, Some(GeoPoint::new(21.1458, 79.0882)));
        assert_eq!(summary.resolved_fuzzy, 1);
    }

    #[test]
    fn unknown_city_is_unresolved_even_when_opted_in() {
        let records = vec![AccidentRecord::new("Zzyzx", "Unknown")];
        let options = MergeOptions {
            accept_best_suggestion: true,
            ..MergeOptions::default()
        };
        let (merged, summary) = merge_coordinates(records, &table(), &options);

        assert!(merged[0].location.is_none());
        assert_eq!(summary.unresolved, 1);
    }

    #[test]
    fn repeated_cities_resolve_consistently() {
        let records = vec![
            AccidentRecord::new("Pune", "Maharashtra"),
            AccidentRecord::new("Unknown", "Unknown"),
            AccidentRecord::new("pune", "Maharashtra"),
        ];
        let (merged, summary) = merge_coordinates(records, &table(), &MergeOptions::default());

        assert_eq!(merged[0].location, merged[2].location);
        assert_eq!(summary.resolved_exact, 2);
        assert_eq!(summary.unresolved, 1);
    }
}
