//! Interactive menu for the accident map toolchain.
//!
//! Provides a `dialoguer` front end so the query loop and the offline
//! coordinate steps can be run without remembering CLI flags.

use accident_map_cli_utils::{IndicatifProgress, MultiProgress};
use accident_map_coordinates::load_table;
use accident_map_coordinates_models::FuzzyMatchConfig;
use accident_map_dataset::merge::MergeOptions;
use accident_map_dataset::{load_accidents, paths};
use accident_map_proximity::DEFAULT_RADIUS_KM;
use dialoguer::{Confirm, Input, Select};

use crate::{offline, query, render};

/// Top-level actions available in the interactive menu.
enum Action {
    Query,
    Lookup,
    Extract,
    Clean,
}

impl Action {
    const ALL: &[Self] = &[Self::Query, Self::Lookup, Self::Extract, Self::Clean];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Query => "Find accidents near a region",
            Self::Lookup => "Look up city coordinates",
            Self::Extract => "Extract coordinates from geonames dump",
            Self::Clean => "Clean extracted coordinates",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected action fails to
/// load its inputs.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Query => query_loop().await?,
        Action::Lookup => lookup_loop()?,
        Action::Extract => {
            let progress = IndicatifProgress::rows_bar(multi, "Reading geonames");
            offline::extract(
                &paths::geonames_path(),
                &paths::city_coordinates_path(),
                &progress,
            )?;
        }
        Action::Clean => {
            offline::clean(
                &paths::city_coordinates_path(),
                &paths::cleaned_coordinates_path(),
                None,
                &FuzzyMatchConfig::default(),
            )?;
        }
    }

    Ok(())
}

/// Loads both datasets once, then answers region queries until the user
/// enters an empty line.
async fn query_loop() -> Result<(), Box<dyn std::error::Error>> {
    let radius_km: f64 = Input::new()
        .with_prompt("Search radius in km")
        .default(DEFAULT_RADIUS_KM)
        .interact_text()?;
    let accept_best_suggestion = Confirm::new()
        .with_prompt("Use the closest spelling when a city name has no exact match?")
        .default(false)
        .interact()?;

    let records = load_accidents(&paths::accidents_path())?;
    let table = load_table(&query::default_coordinates_path())?;
    let merge = MergeOptions {
        accept_best_suggestion,
        ..MergeOptions::default()
    };
    let (prepared, _) = query::prepare_records(records, &table, &merge);

    let geocoder = query::default_geocoder()?;

    loop {
        let region: String = Input::new()
            .with_prompt("Region (empty to quit)")
            .allow_empty(true)
            .interact_text()?;
        if region.trim().is_empty() {
            return Ok(());
        }

        match query::locate_reference(&geocoder, &region).await {
            Ok(Some(reference)) => {
                let outcome = query::find_nearby(&prepared, reference, radius_km);
                query::print_outcome(&outcome);
            }
            Ok(None) => println!("Cannot find coordinates for: {region}"),
            Err(e) => println!("Error fetching location coordinates: {e}"),
        }
        println!();
    }
}

/// Answers city lookups against the coordinate table until the user
/// enters an empty line.
fn lookup_loop() -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(&query::default_coordinates_path())?;
    let fuzzy = FuzzyMatchConfig::default();

    loop {
        let name: String = Input::new()
            .with_prompt("City name (empty to quit)")
            .allow_empty(true)
            .interact_text()?;
        if name.trim().is_empty() {
            return Ok(());
        }
        println!("{}", render::describe_lookup(&name, &table.lookup(&name, &fuzzy)));
    }
}
