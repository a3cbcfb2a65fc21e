#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the three reference tables from the `GeoJSON` archive.
//!
//! Loading happens once at startup. Any failure here is fatal: the server
//! and CLI refuse to start rather than verify against a partial archive.

pub mod config;
pub mod loader;
pub mod parse;

use std::time::Instant;

use fho_verify_event_models::IntervalEvent;
use fho_verify_verification::VerificationDataset;
use thiserror::Error;

pub use config::DataCatalog;

/// Errors that can occur while loading the archive.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// File holds a bare geometry instead of features.
    #[error("Expected a FeatureCollection in {0}")]
    NotFeatureCollection(String),

    /// Geometry or coordinate reference could not be interpreted.
    #[error("Spatial error: {0}")]
    Spatial(#[from] fho_verify_spatial::SpatialError),

    /// Feature has no geometry.
    #[error("Feature has no geometry")]
    MissingGeometry,

    /// Required property is absent or null.
    #[error("Missing attribute {field}")]
    MissingAttribute {
        /// Property name.
        field: &'static str,
    },

    /// Property holds an unrecognized value.
    #[error("Invalid value for {field}: {value}")]
    Attribute {
        /// Property name.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// Timestamp property could not be parsed.
    #[error("Invalid timestamp for {field}: {value}")]
    Timestamp {
        /// Property name.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// Environment variable holds an invalid value.
    #[error("Invalid {name}: {value}")]
    InvalidConfig {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// No partition of a table could be read.
    #[error("No {0} partitions could be loaded")]
    EmptyTable(&'static str),
}

/// Loads forecasts, storm reports and flash flood warnings and builds the
/// verification dataset.
///
/// Warnings are filtered to the flash flood phenomenon here, so the engine
/// only ever sees FFWs.
///
/// # Errors
///
/// * If any table has no readable partition
/// * If a present partition is not valid `GeoJSON`
pub fn load_dataset(catalog: &DataCatalog) -> Result<VerificationDataset, IngestError> {
    let start = Instant::now();
    log::info!("Loading verification archive from {}", catalog.data_dir.display());

    let forecasts = loader::load_table(
        "forecast",
        catalog.forecast_partitions(),
        |feature, crs, issuance| parse::forecast_polygon(feature, crs, *issuance),
    )?;

    let reports = loader::load_table(
        "storm report",
        [(catalog.lsr_path(), ())],
        |feature, crs, _| parse::point_event(feature, crs),
    )?;

    let warnings: Vec<IntervalEvent> = loader::load_table(
        "warning",
        catalog.warning_partitions().into_iter().map(|path| (path, ())),
        |feature, crs, _| parse::interval_event(feature, crs),
    )?;
    let total_warnings = warnings.len();
    let warnings: Vec<IntervalEvent> = warnings
        .into_iter()
        .filter(IntervalEvent::is_flash_flood)
        .collect();
    log::info!(
        "Kept {} flash flood warnings of {total_warnings} warnings",
        warnings.len()
    );

    let dataset = VerificationDataset::new(forecasts, reports, warnings);
    log::info!("Archive loaded in {:.1}s", start.elapsed().as_secs_f64());

    Ok(dataset)
}
