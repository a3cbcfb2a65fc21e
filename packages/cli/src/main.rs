#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for flood hazard outlook verification.
//!
//! Loads the archive once and prints the same JSON the API serves.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fho_verify_ingest::DataCatalog;
use fho_verify_server::api;
use fho_verify_server_models::{IbwStatsRequest, StatsRequest};
use fho_verify_verification::{VerificationDataset, catalog};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "fho_verify", about = "Flood hazard outlook verification")]
struct Cli {
    /// Directory holding the GeoJSON partitions (overrides `FHO_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List dates with at least one forecast polygon
    Dates,
    /// Cumulative POD over a date range
    Stats {
        /// Issuance date (YYYY-MM-DD)
        issuance_date: NaiveDate,
        /// Last issuance date. Defaults to the period's covered days.
        #[arg(long)]
        end_date: Option<NaiveDate>,
        /// Issuance cycle (`00Z`/`am` or `12Z`/`pm`)
        #[arg(long, default_value = "00Z")]
        issuance: String,
        /// Forecast period (`1-3`, `4-7` or `1-7`)
        #[arg(long, default_value = "1-3")]
        period: String,
        /// Per-polygon POD threshold in [0, 1]
        #[arg(long)]
        pod_threshold: Option<f64>,
    },
    /// Impact-tier validation for one issuance cycle
    Ibw {
        /// Issuance date (YYYY-MM-DD)
        issuance_date: NaiveDate,
        /// Issuance cycle (`00Z`/`am` or `12Z`/`pm`)
        #[arg(long, default_value = "00Z")]
        issuance: String,
        /// Forecast period (`1-3`, `4-7` or `1-7`)
        #[arg(long, default_value = "1-3")]
        period: String,
        /// `Considerable` (default) or `Catastrophic`
        #[arg(long)]
        impact_level: Option<String>,
    },
    /// List high-impact forecast cycles and unforecast high-impact warnings
    HighImpact,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn run(
    command: Commands,
    dataset: &VerificationDataset,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match command {
        Commands::Dates => to_json(&catalog::available_dates(dataset))?,
        Commands::Stats {
            issuance_date,
            end_date,
            issuance,
            period,
            pod_threshold,
        } => {
            let request = StatsRequest {
                issuance_date,
                end_date,
                issuance,
                forecast_period: period,
                pod_threshold,
            };
            to_json(&api::stats_response(dataset, &request)?)?
        }
        Commands::Ibw {
            issuance_date,
            issuance,
            period,
            impact_level,
        } => {
            let request = IbwStatsRequest {
                issuance_date,
                issuance,
                forecast_period: period,
                impact_level,
            };
            to_json(&api::ibw_stats_response(dataset, &request)?)?
        }
        Commands::HighImpact => to_json(&catalog::high_impact_events(dataset))?,
    };

    Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut catalog = DataCatalog::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        catalog = catalog.with_data_dir(data_dir);
    }

    let start = Instant::now();
    let dataset = fho_verify_ingest::load_dataset(&catalog)?;
    log::info!("Loaded archive in {:.1}s", start.elapsed().as_secs_f64());

    println!("{}", run(cli.command, &dataset)?);

    Ok(())
}
