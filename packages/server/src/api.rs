//! Request → response, independent of the HTTP layer.
//!
//! The handlers run these on the blocking pool; the CLI calls them
//! directly.

use fho_verify_forecast_models::ImpactLevel;
use fho_verify_server_models::{IbwStatsRequest, IbwStatsResponse, StatsRequest, StatsResponse};
use fho_verify_verification::evaluate::evaluate_date;
use fho_verify_verification::impact::evaluate_impact;
use fho_verify_verification::polygon_pod::{polygon_pod_distribution, validate_threshold};
use fho_verify_verification::range::{RANGE_TIERS, RangeQuery, aggregate_range};
use fho_verify_verification::window::{parse_impact_level, parse_issuance, parse_period};
use fho_verify_verification::{VerificationDataset, VerificationError};
use fho_verify_verification_models::DEFAULT_POD_THRESHOLD;

use crate::geometry::{ibw_geometries, stats_geometries};

/// Cumulative statistics, map layers for the selected date and the
/// per-polygon POD distribution.
///
/// The polygon distribution covers the nominal range
/// `issuance_date..=end_date` (just the issuance date when no end is
/// given), while the cumulative statistics use the period-derived range.
///
/// # Errors
///
/// * If the issuance or period code is unknown
/// * If the end date precedes the issuance date
/// * If the threshold is not a probability
pub fn stats_response(
    dataset: &VerificationDataset,
    request: &StatsRequest,
) -> Result<StatsResponse, VerificationError> {
    let issuance = parse_issuance(&request.issuance)?;
    let period = parse_period(&request.forecast_period)?;
    let threshold = validate_threshold(request.pod_threshold.unwrap_or(DEFAULT_POD_THRESHOLD))?;
    let start = request.issuance_date;

    let query = RangeQuery {
        start,
        end: request.end_date,
        issuance,
        period,
    };
    let statistics = aggregate_range(dataset, &query)?;

    let pod_analysis = polygon_pod_distribution(
        dataset,
        start,
        request.end_date.unwrap_or(start),
        issuance,
        period,
        threshold,
    )?;

    let selected = evaluate_date(dataset, start, issuance, period, RANGE_TIERS);

    Ok(StatsResponse {
        statistics,
        geometries: stats_geometries(&selected),
        pod_analysis,
    })
}

/// Impact-tier statistics and map layers for one issuance cycle.
///
/// # Errors
///
/// * If the issuance, period or impact level is unknown
/// * If the impact level is `Limited`
pub fn ibw_stats_response(
    dataset: &VerificationDataset,
    request: &IbwStatsRequest,
) -> Result<IbwStatsResponse, VerificationError> {
    let issuance = parse_issuance(&request.issuance)?;
    let period = parse_period(&request.forecast_period)?;
    let level = request
        .impact_level
        .as_deref()
        .map_or(Ok(ImpactLevel::Considerable), parse_impact_level)?;

    let evaluation = evaluate_impact(dataset, request.issuance_date, issuance, period, level)?;

    Ok(IbwStatsResponse {
        statistics: evaluation.stats(),
        geometries: ibw_geometries(&evaluation),
        verification_window: evaluation.window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(end_date: Option<NaiveDate>, pod_threshold: Option<f64>) -> StatsRequest {
        StatsRequest {
            issuance_date: NaiveDate::from_ymd_opt(2023, 6, 5).unwrap(),
            end_date,
            issuance: "00Z".to_string(),
            forecast_period: "1-3".to_string(),
            pod_threshold,
        }
    }

    #[test]
    fn threshold_is_checked_before_the_range() {
        let dataset = VerificationDataset::new(Vec::new(), Vec::new(), Vec::new());
        let end_before_start = NaiveDate::from_ymd_opt(2023, 6, 1);

        let result = stats_response(&dataset, &request(end_before_start, Some(1.5)));
        assert!(matches!(result, Err(VerificationError::InvalidThreshold(t)) if (t - 1.5).abs() < f64::EPSILON));

        let result = stats_response(&dataset, &request(end_before_start, None));
        assert!(matches!(
            result,
            Err(VerificationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn empty_dataset_is_all_zeros() {
        let dataset = VerificationDataset::new(Vec::new(), Vec::new(), Vec::new());
        let response = stats_response(&dataset, &request(None, Some(0.5))).unwrap();
        assert_eq!(response.statistics.total_days, 3);
        assert!(response.statistics.pod.abs() < f64::EPSILON);
        assert_eq!(response.pod_analysis.total_polygons, 0);
        assert!((response.pod_analysis.threshold_value - 0.5).abs() < f64::EPSILON);
    }
}
