//! Where the reference tables live on disk.

use std::path::{Path, PathBuf};

use fho_verify_forecast_models::IssuanceTime;

use crate::IngestError;

/// Default directory holding the partitions.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default first archive year.
pub const DEFAULT_FIRST_YEAR: i32 = 2022;
/// Default last archive year (inclusive).
pub const DEFAULT_LAST_YEAR: i32 = 2025;
/// Default storm report file name.
pub const DEFAULT_LSR_FILE: &str = "lsrs_flood.geojson";

/// Layout of the `GeoJSON` archive.
///
/// Forecasts are partitioned by year and issuance cycle
/// (`fho_{year}_{am|pm}.geojson`), warnings by year (`wwa_{year}.geojson`),
/// and storm reports live in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCatalog {
    /// Directory holding every partition.
    pub data_dir: PathBuf,
    /// First archive year.
    pub first_year: i32,
    /// Last archive year, inclusive.
    pub last_year: i32,
    /// Storm report file name inside `data_dir`.
    pub lsr_file: String,
}

impl Default for DataCatalog {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            lsr_file: DEFAULT_LSR_FILE.to_string(),
        }
    }
}

impl DataCatalog {
    /// Reads the catalog from `FHO_DATA_DIR`, `FHO_FIRST_YEAR`,
    /// `FHO_LAST_YEAR` and `FHO_LSR_FILE`, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// * If a year variable is set but not an integer
    pub fn from_env() -> Result<Self, IngestError> {
        let defaults = Self::default();

        Ok(Self {
            data_dir: std::env::var("FHO_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            first_year: year_var("FHO_FIRST_YEAR", defaults.first_year)?,
            last_year: year_var("FHO_LAST_YEAR", defaults.last_year)?,
            lsr_file: std::env::var("FHO_LSR_FILE").unwrap_or(defaults.lsr_file),
        })
    }

    /// Replaces the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Forecast partitions, each tagged with the cycle it holds.
    #[must_use]
    pub fn forecast_partitions(&self) -> Vec<(PathBuf, IssuanceTime)> {
        (self.first_year..=self.last_year)
            .flat_map(|year| {
                IssuanceTime::all().iter().map(move |issuance| {
                    (
                        self.data_dir.join(format!("fho_{year}_{issuance}.geojson")),
                        *issuance,
                    )
                })
            })
            .collect()
    }

    /// Warning partitions, one per year.
    #[must_use]
    pub fn warning_partitions(&self) -> Vec<PathBuf> {
        (self.first_year..=self.last_year)
            .map(|year| self.data_dir.join(format!("wwa_{year}.geojson")))
            .collect()
    }

    /// Storm report file.
    #[must_use]
    pub fn lsr_path(&self) -> PathBuf {
        self.data_dir.join(&self.lsr_file)
    }
}

fn year_var(name: &'static str, default: i32) -> Result<i32, IngestError> {
    std::env::var(name).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| IngestError::InvalidConfig { name, value })
    })
}
