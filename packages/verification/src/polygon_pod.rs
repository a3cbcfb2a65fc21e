//! Per-polygon POD distribution.
//!
//! Every Limited polygon in the range is scored on its own, without
//! merging. The numerator is the number of events of either type that
//! intersect the polygon, from the full unwindowed tables. The denominator
//! is the global event population, so the score measures how much of all
//! recorded flooding a single polygon covers.

use chrono::NaiveDate;
use fho_verify_forecast_models::{ForecastPeriod, ForecastPolygon, IssuanceTime};
use fho_verify_verification_models::{PodAnalysis, pod};
use geo::Intersects;
use rayon::prelude::*;

use crate::range::RANGE_TIERS;
use crate::{VerificationDataset, VerificationError};

/// Checks that `threshold` is a probability.
///
/// # Errors
///
/// * [`VerificationError::InvalidThreshold`] if it is not finite or lies
///   outside `[0, 1]`
pub fn validate_threshold(threshold: f64) -> Result<f64, VerificationError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(VerificationError::InvalidThreshold(threshold))
    }
}

/// Number of events, of either type, intersecting `polygon`.
#[must_use]
pub fn events_intersecting(dataset: &VerificationDataset, polygon: &ForecastPolygon) -> u64 {
    let area = &polygon.geometry;
    let reports = dataset
        .reports_near(area)
        .filter(|report| area.intersects(&report.geometry))
        .count();
    let warnings = dataset
        .warnings_near(area)
        .filter(|warning| area.intersects(&warning.geometry))
        .count();

    (reports + warnings) as u64
}

/// Scores every Limited polygon issued in `start..=end` for the cycle and
/// counts those at or above `threshold`.
///
/// # Errors
///
/// * [`VerificationError::InvalidDateRange`] if `end` precedes `start`
/// * [`VerificationError::InvalidThreshold`] if `threshold` is not a
///   probability
#[allow(clippy::cast_precision_loss)]
pub fn polygon_pod_distribution(
    dataset: &VerificationDataset,
    start: NaiveDate,
    end: NaiveDate,
    issuance: IssuanceTime,
    period: ForecastPeriod,
    threshold: f64,
) -> Result<PodAnalysis, VerificationError> {
    let threshold = validate_threshold(threshold)?;
    if end < start {
        return Err(VerificationError::InvalidDateRange { start, end });
    }

    let polygons: Vec<&ForecastPolygon> = start
        .iter_days()
        .take_while(|date| *date <= end)
        .flat_map(|date| dataset.cycle_polygons(date, issuance, period, RANGE_TIERS))
        .collect();

    let population = (dataset.reports().len() + dataset.warnings().len()) as u64;

    let meeting = polygons
        .par_iter()
        .filter(|polygon| {
            let hits = events_intersecting(dataset, polygon);
            pod(hits, population - hits) >= threshold
        })
        .count() as u64;

    let total = polygons.len() as u64;
    let threshold_percentage = if total == 0 {
        0.0
    } else {
        meeting as f64 / total as f64 * 100.0
    };

    log::debug!(
        "{meeting}/{total} polygons over {start}..={end} reach POD {threshold} against {population} events"
    );

    Ok(PodAnalysis {
        polygons_meeting_threshold: meeting,
        total_polygons: total,
        threshold_percentage,
        threshold_value: threshold,
    })
}
