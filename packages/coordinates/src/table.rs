//! The deduplicated city coordinate table.
//!
//! Raw rows are grouped by their normalized key. Each group collapses to a
//! single [`CityCoordinate`] whose coordinate is the mean of the group and
//! whose display name is the first row seen. Entries keep the order in
//! which their key first appeared, which is also the tie-break order for
//! fuzzy suggestions.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use accident_map_coordinates_models::{
    CitySuggestion, CleanedCityRow, DuplicateGroup, FuzzyMatchConfig, GeoPoint, RawCityRow,
};

use crate::CoordinatesError;
use crate::normalize::normalize;
use crate::similarity::ratio;

/// One city in the deduplicated table.
///
/// The key is derived from the rows that built the entry and cannot be set
/// from outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CityCoordinate {
    name: String,
    key: String,
    location: GeoPoint,
}

impl CityCoordinate {
    /// Representative display name (first row seen for this key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized matching key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Averaged coordinate.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Outcome of looking a city name up in a [`CoordinateTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum CityLookup<'a> {
    /// The normalized name is a key in the table.
    Found(&'a CityCoordinate),
    /// No exact key, but these keys are similar enough to suggest.
    Suggestions(Vec<CitySuggestion>),
    /// Nothing matched, not even approximately.
    NotFound,
}

impl CityLookup<'_> {
    /// The coordinate on an exact hit.
    #[must_use]
    pub const fn location(&self) -> Option<GeoPoint> {
        match self {
            Self::Found(entry) => Some(entry.location),
            Self::Suggestions(_) | Self::NotFound => None,
        }
    }
}

/// City name to coordinate lookup, one entry per normalized key.
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: Vec<CityCoordinate>,
    index: BTreeMap<String, usize>,
    duplicates: Vec<DuplicateGroup>,
    raw_rows: usize,
}

impl CoordinateTable {
    /// Builds the table from raw rows, averaging rows that share a key.
    ///
    /// Rows with a non-finite latitude or longitude are skipped.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = RawCityRow>) -> Self {
        let mut groups: Vec<(String, Vec<RawCityRow>)> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut raw_rows = 0;

        for row in rows {
            if !row.latitude.is_finite() || !row.longitude.is_finite() {
                log::trace!("skipping {:?}: non-finite coordinate", row.city_name);
                continue;
            }
            raw_rows += 1;

            let key = normalize(&row.city_name);
            if let Some(&i) = index.get(&key) {
                groups[i].1.push(row);
            } else {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }

        let mut entries = Vec::with_capacity(groups.len());
        let mut duplicates = Vec::new();

        for (key, members) in groups {
            entries.push(merge_group(&key, &members));
            if members.len() > 1 {
                duplicates.push(DuplicateGroup { key, rows: members });
            }
        }

        Self {
            entries,
            index,
            duplicates,
            raw_rows,
        }
    }

    /// Reads raw rows from CSV and builds the table.
    ///
    /// Accepts both `city_coordinates.csv` and the cleaned output, since
    /// both carry `City Name`, `Latitude` and `Longitude` columns. Rows that
    /// fail to deserialize are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] if the header row cannot be read.
    pub fn read_csv(reader: impl Read) -> Result<Self, CoordinatesError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        csv_reader.headers()?;

        let mut rows = Vec::new();
        for result in csv_reader.deserialize::<RawCityRow>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => log::trace!("skipping malformed coordinate row: {e}"),
            }
        }

        Ok(Self::from_rows(rows))
    }

    /// Writes the cleaned table as CSV (`City_norm, Latitude, Longitude,
    /// City Name`).
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] if serialization or flushing fails.
    pub fn write_csv(&self, writer: impl Write) -> Result<(), CoordinatesError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            csv_writer.serialize(CleanedCityRow {
                city_norm: entry.key.clone(),
                latitude: entry.location.latitude,
                longitude: entry.location.longitude,
                city_name: entry.name.clone(),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Number of unique cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of raw rows that went into the table.
    #[must_use]
    pub const fn raw_row_count(&self) -> usize {
        self.raw_rows
    }

    /// Entries in first-appearance order.
    #[must_use]
    pub fn entries(&self) -> &[CityCoordinate] {
        &self.entries
    }

    /// Groups of raw rows that were merged into a single entry.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateGroup] {
        &self.duplicates
    }

    /// Exact lookup by (unnormalized) city name.
    #[must_use]
    pub fn get(&self, city_name: &str) -> Option<&CityCoordinate> {
        self.index
            .get(&normalize(city_name))
            .map(|&i| &self.entries[i])
    }

    /// Looks a city name up, falling back to fuzzy suggestions.
    #[must_use]
    pub fn lookup(&self, city_name: &str, config: &FuzzyMatchConfig) -> CityLookup<'_> {
        let key = normalize(city_name);
        if let Some(&i) = self.index.get(&key) {
            return CityLookup::Found(&self.entries[i]);
        }

        let suggestions = self.suggest(&key, config);
        if suggestions.is_empty() {
            CityLookup::NotFound
        } else {
            CityLookup::Suggestions(suggestions)
        }
    }

    /// Ranks keys by similarity to an already-normalized key.
    ///
    /// Only keys scoring at least `config.cutoff` are returned, best first,
    /// at most `config.max_suggestions` of them. Equal scores keep table
    /// order.
    ///
    /// Each score is `ratio(candidate, query)`. The ratio is not symmetric
    /// and the candidate key always goes first.
    #[must_use]
    pub fn suggest(&self, key: &str, config: &FuzzyMatchConfig) -> Vec<CitySuggestion> {
        if config.max_suggestions == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &CityCoordinate)> = self
            .entries
            .iter()
            .map(|entry| (ratio(&entry.key, key), entry))
            .filter(|(score, _)| *score >= config.cutoff)
            .collect();

        // stable: ties stay in table order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(config.max_suggestions);

        scored
            .into_iter()
            .map(|(score, entry)| CitySuggestion {
                name: entry.name.clone(),
                key: entry.key.clone(),
                score,
            })
            .collect()
    }
}

/// Collapses one key's rows into a single entry.
#[allow(clippy::cast_precision_loss)]
fn merge_group(key: &str, members: &[RawCityRow]) -> CityCoordinate {
    let n = members.len() as f64;
    let latitude = members.iter().map(|r| r.latitude).sum::<f64>() / n;
    let longitude = members.iter().map(|r| r.longitude).sum::<f64>() / n;

    CityCoordinate {
        name: members[0].city_name.clone(),
        key: key.to_string(),
        location: GeoPoint::new(latitude, longitude),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn row(name: &str, latitude: f64, longitude: f64) -> RawCityRow {
        RawCityRow {
            city_name: name.to_string(),
            latitude,
            longitude,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn metro_table() -> CoordinateTable {
        CoordinateTable::from_rows([
            row("Delhi", 28.6139, 77.2090),
            row("Mumbai", 19.0760, 72.8777),
            row("Chennai", 13.0827, 80.2707),
        ])
    }

    #[test]
    fn keys_are_unique_after_build() {
        let table = CoordinateTable::from_rows([
            row("Delhi", 28.0, 77.0),
            row("DELHI", 29.0, 78.0),
            row("Délhi ", 30.0, 79.0),
            row("Pune", 18.5, 73.8),
            row("pune", 18.6, 73.9),
        ]);

        let keys: Vec<&str> = table.entries().iter().map(CityCoordinate::key).collect();
        let unique: BTreeSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(table.len(), 2);
        assert_eq!(table.raw_row_count(), 5);
    }

    #[test]
    fn merged_coordinate_is_componentwise_mean() {
        let table = CoordinateTable::from_rows([
            row("Delhi", 28.0, 77.0),
            row("DELHI", 29.0, 78.0),
            row("Délhi", 30.0, 82.0),
        ]);

        let entry = table.get("delhi").unwrap();
        assert!(close(entry.location().latitude, 29.0));
        assert!(close(entry.location().longitude, 79.0));
    }

    #[test]
    fn display_name_is_first_seen() {
        let table = CoordinateTable::from_rows([row("DELHI", 28.0, 77.0), row("Delhi", 29.0, 78.0)]);
        assert_eq!(table.get("delhi").unwrap().name(), "DELHI");
    }

    #[test]
    fn entries_keep_first_appearance_order() {
        let table = CoordinateTable::from_rows([
            row("Pune", 18.5, 73.8),
            row("Agra", 27.1, 78.0),
            row("PUNE", 18.6, 73.9),
        ]);
        let keys: Vec<&str> = table.entries().iter().map(CityCoordinate::key).collect();
        assert_eq!(keys, ["pune", "agra"]);
    }

    #[test]
    fn reports_duplicate_groups() {
        let table = CoordinateTable::from_rows([
            row("Delhi", 28.0, 77.0),
            row("Agra", 27.1, 78.0),
            row("DELHI", 29.0, 78.0),
        ]);
        assert_eq!(table.duplicates().len(), 1);
        assert_eq!(table.duplicates()[0].key, "delhi");
        assert_eq!(table.duplicates()[0].rows.len(), 2);
    }

    #[test]
    fn skips_non_finite_rows() {
        let table = CoordinateTable::from_rows([
            row("Delhi", f64::NAN, 77.0),
            row("Delhi", 28.0, 77.0),
        ]);
        assert_eq!(table.raw_row_count(), 1);
        assert!(close(table.get("Delhi").unwrap().location().latitude, 28.0));
    }

    #[test]
    fn exact_lookup_is_accent_and_case_insensitive() {
        let table = metro_table();
        let config = FuzzyMatchConfig::default();
        for query in ["Delhi", "DELHI", "  délhi "] {
            match table.lookup(query, &config) {
                CityLookup::Found(entry) => assert_eq!(entry.key(), "delhi"),
                other => panic!("expected exact hit for {query:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn misspelling_yields_suggestion_not_match() {
        let table = metro_table();
        let lookup = table.lookup("dehli", &FuzzyMatchConfig::default());

        let CityLookup::Suggestions(suggestions) = &lookup else {
            panic!("expected suggestions, got {lookup:?}");
        };
        assert_eq!(suggestions[0].key, "delhi");
        assert_eq!(suggestions[0].name, "Delhi");
        assert!(suggestions.iter().all(|s| s.key != "mumbai"));
        assert!(lookup_location_is_none(&table, "dehli"));
    }

    fn lookup_location_is_none(table: &CoordinateTable, query: &str) -> bool {
        table
            .lookup(query, &FuzzyMatchConfig::default())
            .location()
            .is_none()
    }

    #[test]
    fn scores_candidate_against_query() {
        let table = CoordinateTable::from_rows([row("Nagpur", 21.1458, 79.0882)]);
        let lookup = table.lookup("Nargupr", &FuzzyMatchConfig::default());

        let CityLookup::Suggestions(suggestions) = &lookup else {
            panic!("expected suggestions, got {lookup:?}");
        };
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].key, "nagpur");
        assert!(close(suggestions[0].score, 10.0 / 13.0));
    }

    #[test]
    fn gibberish_is_not_found() {
        let table = metro_table();
        assert_eq!(
            table.lookup("zzzzqqq", &FuzzyMatchConfig::default()),
            CityLookup::NotFound
        );
    }

    #[test]
    fn suggestions_ranked_and_capped() {
        let table = CoordinateTable::from_rows([
            row("Rampur", 28.8, 79.0),
            row("Raipur", 21.2, 81.6),
            row("Jaipur", 26.9, 75.8),
            row("Nagpur", 21.1, 79.1),
            row("Rajpur", 30.4, 78.1),
        ]);
        let config = FuzzyMatchConfig {
            cutoff: 0.6,
            max_suggestions: 2,
        };

        let suggestions = table.suggest("raipurr", &config);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].key, "raipur");
        assert!(suggestions[0].score >= suggestions[1].score);
    }

    #[test]
    fn equal_scores_keep_table_order() {
        let table = CoordinateTable::from_rows([
            row("Abcx", 1.0, 1.0),
            row("Abcy", 2.0, 2.0),
            row("Abcz", 3.0, 3.0),
        ]);
        let suggestions = table.suggest("abcw", &FuzzyMatchConfig::default());
        let keys: Vec<&str> = suggestions.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["abcx", "abcy", "abcz"]);
    }

    #[test]
    fn cutoff_is_configurable() {
        let table = metro_table();
        let strict = FuzzyMatchConfig {
            cutoff: 0.9,
            max_suggestions: 3,
        };
        assert_eq!(table.lookup("dehli", &strict), CityLookup::NotFound);
    }

    #[test]
    fn zero_cap_returns_nothing() {
        let table = metro_table();
        let config = FuzzyMatchConfig {
            cutoff: 0.0,
            max_suggestions: 0,
        };
        assert!(table.suggest("dehli", &config).is_empty());
    }

    #[test]
    fn reads_raw_and_cleaned_csv() {
        let raw = "City Name,Latitude,Longitude\nDelhi,28.0,77.0\nDELHI,30.0,79.0\nPune,18.52,73.85\n";
        let table = CoordinateTable::read_csv(raw.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let cleaned = "City_norm,Latitude,Longitude,City Name\ndelhi,29.0,78.0,Delhi\n";
        let table = CoordinateTable::read_csv(cleaned.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(close(table.get("Delhi").unwrap().location().latitude, 29.0));
    }

    #[test]
    fn skips_malformed_csv_rows() {
        let raw = "City Name,Latitude,Longitude\nDelhi,abc,77.0\nPune,18.52,73.85\n";
        let table = CoordinateTable::read_csv(raw.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("Pune").is_some());
    }

    #[test]
    fn writes_cleaned_csv() {
        let table = CoordinateTable::from_rows([row("Delhi", 28.0, 77.0), row("DELHI", 30.0, 79.0)]);
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("City_norm,Latitude,Longitude,City Name"));
        assert_eq!(lines.next(), Some("delhi,29.0,78.0,Delhi"));
        assert_eq!(lines.next(), None);
    }
}
