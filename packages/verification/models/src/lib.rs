#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the verification engine.
//!
//! These are plain serializable records. Field names follow the JSON
//! contract the map frontend reads, so they are kept in `snake_case`.

use chrono::{NaiveDate, NaiveDateTime};
use fho_verify_event_models::SeverityTag;
use fho_verify_forecast_models::CycleKey;
use serde::{Deserialize, Serialize};

/// Default POD threshold for the per-polygon distribution.
pub const DEFAULT_POD_THRESHOLD: f64 = 0.7;

/// Probability of detection, `hits / (hits + misses)`.
///
/// Defined as `0.0` when there is nothing to detect.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pod(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// The time span an issuance cycle is verified over.
///
/// Point events are members when `start <= t < end`. Interval events are
/// members when they overlap the closed window: `issued <= end` and
/// `expired >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationWindow {
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// End (exclusive for point events).
    pub end: NaiveDateTime,
}

impl VerificationWindow {
    /// Half-open membership test for point events.
    #[must_use]
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Closed overlap test for interval events.
    #[must_use]
    pub fn overlaps(&self, issued: NaiveDateTime, expired: NaiveDateTime) -> bool {
        issued <= self.end && expired >= self.start
    }
}

/// Hit and miss counts for one day of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Issuance date evaluated.
    pub date: NaiveDate,
    /// Whether any forecast polygon was issued for this cycle. A `false`
    /// here is a legitimate zero row, not an exclusion.
    pub forecast_issued: bool,
    /// LSRs inside the coverage.
    pub lsr_hits: u64,
    /// LSRs outside the coverage.
    pub lsr_misses: u64,
    /// FFWs intersecting the coverage.
    pub ffw_hits: u64,
    /// FFWs not intersecting the coverage.
    pub ffw_misses: u64,
}

impl DailyStats {
    /// An all-zero row.
    #[must_use]
    pub const fn zero(date: NaiveDate, forecast_issued: bool) -> Self {
        Self {
            date,
            forecast_issued,
            lsr_hits: 0,
            lsr_misses: 0,
            ffw_hits: 0,
            ffw_misses: 0,
        }
    }

    /// LSR and FFW hits combined.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.lsr_hits + self.ffw_hits
    }

    /// LSR and FFW misses combined.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.lsr_misses + self.ffw_misses
    }
}

/// Cumulative statistics over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeStats {
    /// Overall probability of detection.
    pub pod: f64,
    /// All hits.
    pub total_hits: u64,
    /// All misses.
    pub total_misses: u64,
    /// LSR hits.
    pub lsr_hits: u64,
    /// LSR misses.
    pub lsr_misses: u64,
    /// FFW hits.
    pub ffw_hits: u64,
    /// FFW misses.
    pub ffw_misses: u64,
    /// Number of days evaluated.
    pub total_days: usize,
    /// Evaluated days, `YYYY-MM-DD`, ascending.
    pub days_included: Vec<String>,
    /// Days in the range for which no verification window could be
    /// derived, `YYYY-MM-DD`, ascending.
    pub days_excluded: Vec<String>,
    /// Evaluated days with no forecast polygon issued, `YYYY-MM-DD`.
    pub days_without_forecast: Vec<String>,
    /// Per-day breakdown.
    pub daily: Vec<DailyStats>,
}

/// Fraction of individual forecast polygons meeting a POD threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodAnalysis {
    /// Polygons whose POD is at least `threshold_value`.
    pub polygons_meeting_threshold: u64,
    /// Polygons evaluated.
    pub total_polygons: u64,
    /// `polygons_meeting_threshold / total_polygons * 100`, or 0.
    pub threshold_percentage: f64,
    /// The threshold applied.
    pub threshold_value: f64,
}

/// Statistics for the impact-tier validation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactStats {
    /// `hits / (hits + misses)`, or 0.
    pub pod: f64,
    /// Warnings with the selected tag intersecting the coverage.
    pub hits: u64,
    /// Warnings counted against the coverage without intersecting it.
    pub misses: u64,
    /// Warnings without a high-impact tag.
    pub ffws_no_tag: u64,
    /// `hits + misses + ffws_no_tag`.
    pub total_ffws: u64,
}

/// A high-impact warning issued on a day without any high-impact
/// forecast polygon.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnforecastWarning {
    /// Issue date.
    pub date: NaiveDate,
    /// Damage-threat tag.
    pub tag: SeverityTag,
    /// Issue clock time, `HH:MM:SS`.
    pub issued: String,
    /// Expiry clock time, `HH:MM:SS`.
    pub expired: String,
}

/// Dates with high-impact forecasts or warnings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighImpactCatalog {
    /// Cycles with a Considerable forecast polygon.
    pub considerable_fho: Vec<CycleKey>,
    /// Cycles with a Catastrophic forecast polygon.
    pub catastrophic_fho: Vec<CycleKey>,
    /// High-impact warnings with no high-impact forecast that day.
    pub high_impact_ffws: Vec<UnforecastWarning>,
}
