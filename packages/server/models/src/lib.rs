#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the forecast verification server.
//!
//! Keys stay `snake_case`: the map frontend reads them as-is. Request
//! codes (issuance, period, impact level) arrive as raw strings and are
//! validated by the handlers so bad values produce a descriptive error
//! instead of a generic deserialization failure.

use chrono::NaiveDate;
use fho_verify_verification_models::{CumulativeStats, ImpactStats, PodAnalysis, VerificationWindow};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsRequest {
    /// Forecast issuance date the user selected.
    pub issuance_date: NaiveDate,
    /// Optional inclusive end of the range. An empty string counts as
    /// absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    /// Issuance cycle (`00Z`, `12Z`, `am`, `pm`).
    pub issuance: String,
    /// Forecast period code (`1-3`, `4-7`, `1-7`).
    pub forecast_period: String,
    /// Per-polygon POD threshold, default 0.7.
    #[serde(default)]
    pub pod_threshold: Option<f64>,
}

/// Body of `POST /api/ibw-stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct IbwStatsRequest {
    /// Forecast issuance date.
    pub issuance_date: NaiveDate,
    /// Issuance cycle.
    pub issuance: String,
    /// Forecast period code.
    pub forecast_period: String,
    /// `Considerable` (default) or `Catastrophic`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub impact_level: Option<String>,
}

/// Map layers for the selected issuance date.
#[derive(Debug, Clone, Serialize)]
pub struct StatsGeometries {
    /// Merged coverage as a `Feature`, or an empty `FeatureCollection`
    /// when nothing was forecast.
    pub fho: GeoJson,
    /// Storm reports inside the coverage.
    pub lsrs_hit: FeatureCollection,
    /// Storm reports outside the coverage.
    pub lsrs_miss: FeatureCollection,
    /// Warnings intersecting the coverage.
    pub ffws_hit: FeatureCollection,
    /// Warnings not intersecting the coverage.
    pub ffws_miss: FeatureCollection,
}

/// Response of `POST /api/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cumulative range statistics.
    pub statistics: CumulativeStats,
    /// Map layers for the selected date.
    pub geometries: StatsGeometries,
    /// Per-polygon POD distribution.
    pub pod_analysis: PodAnalysis,
}

/// Map layers for the impact-tier view.
#[derive(Debug, Clone, Serialize)]
pub struct IbwGeometries {
    /// Merged Considerable coverage, `null` geometry when none.
    pub fho_considerable: Feature,
    /// Merged Catastrophic coverage, `null` geometry when none.
    pub fho_catastrophic: Feature,
    /// Individual Limited polygons for context.
    pub limited: FeatureCollection,
    /// Matching-tag warnings inside the coverage.
    pub hits: FeatureCollection,
    /// Matching-tag warnings outside the coverage.
    pub misses: FeatureCollection,
    /// Warnings tagged with the other high-impact tier.
    pub other_impact: FeatureCollection,
    /// Untagged warnings.
    pub no_tag: FeatureCollection,
}

/// Response of `POST /api/ibw-stats`.
#[derive(Debug, Clone, Serialize)]
pub struct IbwStatsResponse {
    /// Impact-tier statistics.
    pub statistics: ImpactStats,
    /// Map layers.
    pub geometries: IbwGeometries,
    /// Window the warnings were drawn from.
    pub verification_window: VerificationWindow,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable message.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Treats a missing, `null` or blank string field as `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
