//! Cumulative POD over an inclusive range of issuance dates.

use chrono::{Days, NaiveDate};
use fho_verify_forecast_models::{ForecastPeriod, ImpactLevel, IssuanceTime};
use fho_verify_verification_models::{CumulativeStats, DailyStats, pod};
use rayon::prelude::*;

use crate::evaluate::evaluate_date;
use crate::{VerificationDataset, VerificationError};

/// Range statistics are always computed at the Limited tier.
pub const RANGE_TIERS: &[ImpactLevel] = &[ImpactLevel::Limited];

/// A cumulative statistics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    /// Issuance date the user selected.
    pub start: NaiveDate,
    /// Optional inclusive end date.
    pub end: Option<NaiveDate>,
    /// AM or PM cycle.
    pub issuance: IssuanceTime,
    /// Lead window.
    pub period: ForecastPeriod,
}

impl RangeQuery {
    /// Resolves the inclusive range of issuance dates to evaluate.
    ///
    /// With an explicit end date the range is `start..=end`. Without one
    /// it covers the days the period forecasts for: `start..=start+2` for
    /// 1-3, `start+3..=start+6` for 4-7 and `start..=start+6` for 1-7.
    ///
    /// # Errors
    ///
    /// * [`VerificationError::InvalidDateRange`] if `end` precedes `start`
    /// * [`VerificationError::NoVerificationWindow`] if the derived range
    ///   leaves the calendar
    pub fn resolve(&self) -> Result<(NaiveDate, NaiveDate), VerificationError> {
        if let Some(end) = self.end {
            if end < self.start {
                return Err(VerificationError::InvalidDateRange {
                    start: self.start,
                    end,
                });
            }
            return Ok((self.start, end));
        }

        let (first, last) = self.period.covered_days();
        let shift = |offset| self.start.checked_add_days(Days::new(offset));

        shift(first)
            .zip(shift(last))
            .ok_or(VerificationError::NoVerificationWindow {
                date: self.start,
                issuance: self.issuance,
                period: self.period,
            })
    }
}

/// Evaluates every issuance date in the resolved range and folds the
/// per-day counts into cumulative statistics.
///
/// Days are evaluated in parallel and folded in date order, so repeated
/// calls return identical results.
///
/// A day lands in `days_excluded` only when no verification window can be
/// derived for it, which happens solely at the end of chrono's calendar;
/// for real archive dates the list is empty. Days without forecast
/// polygons are zero rows listed in `days_without_forecast`.
///
/// # Errors
///
/// * If the range cannot be resolved, see [`RangeQuery::resolve`]
pub fn aggregate_range(
    dataset: &VerificationDataset,
    query: &RangeQuery,
) -> Result<CumulativeStats, VerificationError> {
    let (start, end) = query.resolve()?;
    let dates: Vec<NaiveDate> = std::iter::successors(Some(start), NaiveDate::succ_opt)
        .take_while(|date| *date <= end)
        .collect();

    log::debug!(
        "Aggregating {} {} {} over {start}..={end} ({} days)",
        query.issuance,
        query.period,
        RANGE_TIERS[0],
        dates.len()
    );

    let rows: Vec<Option<DailyStats>> = dates
        .par_iter()
        .map(|date| {
            let evaluation =
                evaluate_date(dataset, *date, query.issuance, query.period, RANGE_TIERS);
            evaluation.window.map(|_| evaluation.stats())
        })
        .collect();

    let mut stats = CumulativeStats {
        pod: 0.0,
        total_hits: 0,
        total_misses: 0,
        lsr_hits: 0,
        lsr_misses: 0,
        ffw_hits: 0,
        ffw_misses: 0,
        total_days: 0,
        days_included: Vec::new(),
        days_excluded: Vec::new(),
        days_without_forecast: Vec::new(),
        daily: Vec::with_capacity(rows.len()),
    };

    for (date, row) in dates.iter().zip(rows) {
        let label = date.format("%Y-%m-%d").to_string();
        let Some(row) = row else {
            stats.days_excluded.push(label);
            continue;
        };

        stats.lsr_hits += row.lsr_hits;
        stats.lsr_misses += row.lsr_misses;
        stats.ffw_hits += row.ffw_hits;
        stats.ffw_misses += row.ffw_misses;
        if !row.forecast_issued {
            stats.days_without_forecast.push(label.clone());
        }
        stats.days_included.push(label);
        stats.daily.push(row);
    }

    stats.total_hits = stats.lsr_hits + stats.ffw_hits;
    stats.total_misses = stats.lsr_misses + stats.ffw_misses;
    stats.total_days = stats.days_included.len();
    stats.pod = pod(stats.total_hits, stats.total_misses);

    Ok(stats)
}
