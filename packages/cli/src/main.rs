#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the accident map toolchain.
//!
//! Uses `indicatif-log-bridge` (via [`accident_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

use accident_map_cli::query::{self, QueryRequest};
use accident_map_cli::{CleanArgs, ExtractArgs, LookupArgs, QueryArgs, interactive, offline};
use accident_map_cli_utils::IndicatifProgress;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "accident_map",
    about = "Find recorded road accidents near a region in India"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract city coordinates from a geonames country dump
    Extract(ExtractArgs),
    /// Deduplicate the extracted coordinates by normalized city name
    Clean(CleanArgs),
    /// Look up city names in the coordinate table
    Lookup(LookupArgs),
    /// List accidents within a radius of a region
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = accident_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Regional Accident Hotspot Finder");
        println!();
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Extract(args) => {
            let progress = IndicatifProgress::rows_bar(&multi, "Reading geonames");
            offline::extract(&args.input(), &args.output(), &progress)?;
        }
        Commands::Clean(args) => {
            offline::clean(
                &args.input(),
                &args.output(),
                args.sample.as_deref(),
                &args.fuzzy.into(),
            )?;
        }
        Commands::Lookup(args) => {
            offline::lookup(&args.coordinates(), &args.names, &args.fuzzy.into())?;
        }
        Commands::Query(args) => {
            let request = QueryRequest::from(args);
            query::execute(&request).await?;
        }
    }

    Ok(())
}
