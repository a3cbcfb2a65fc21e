#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Verification engine for flood hazard outlooks.
//!
//! Every operation is a pure function of an immutable
//! [`VerificationDataset`] and the request parameters:
//!
//! 1. [`window`] maps an issuance cycle to its verification window.
//! 2. [`classify`] splits events into hits and misses against a merged
//!    forecast coverage.
//! 3. [`evaluate`] runs one issuance date end to end.
//! 4. [`range`] aggregates a date range into cumulative POD statistics.
//! 5. [`polygon_pod`] scores each forecast polygon on its own.
//! 6. [`impact`] validates the Considerable/Catastrophic tiers against
//!    tagged warnings.
//! 7. [`catalog`] lists available and high-impact dates.
//!
//! Empty inputs (no polygons, no events) are never errors; they produce
//! zero-valued results. Only malformed requests return
//! [`VerificationError`].

pub mod catalog;
pub mod classify;
pub mod dataset;
pub mod evaluate;
pub mod impact;
pub mod polygon_pod;
pub mod range;
pub mod window;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dataset::VerificationDataset;

use chrono::NaiveDate;
use fho_verify_forecast_models::{ForecastPeriod, ImpactLevel, IssuanceTime};
use thiserror::Error;

/// Request validation failures. Nothing partial is returned alongside
/// these.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// End date precedes the issuance date.
    #[error("Invalid date range: End date {end} cannot be before the FHO Issuance Date {start}")]
    InvalidDateRange {
        /// Issuance date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Forecast period code is not one of `1-3`, `4-7`, `1-7`.
    #[error("Unknown forecast period '{0}': expected one of 1-3, 4-7, 1-7")]
    UnknownForecastPeriod(String),

    /// Issuance code is not `am`, `pm`, `00Z` or `12Z`.
    #[error("Unknown issuance '{0}': expected one of am, pm, 00Z, 12Z")]
    UnknownIssuance(String),

    /// Impact level is not one of the three tiers.
    #[error("Unknown impact level '{0}': expected Considerable or Catastrophic")]
    UnknownImpactLevel(String),

    /// Impact level cannot be verified against warning damage tags.
    #[error("Impact level {0} cannot be validated against warning damage tags")]
    UnsupportedImpactLevel(ImpactLevel),

    /// POD threshold is not a probability.
    #[error("POD threshold {0} must be between 0 and 1")]
    InvalidThreshold(f64),

    /// No verification window can be derived for the cycle.
    #[error("Invalid verification window for {date} ({issuance} issuance, period {period})")]
    NoVerificationWindow {
        /// Issuance date.
        date: NaiveDate,
        /// AM or PM issuance.
        issuance: IssuanceTime,
        /// Lead window.
        period: ForecastPeriod,
    },
}
