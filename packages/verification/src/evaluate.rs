//! Single issuance date evaluation.

use chrono::NaiveDate;
use fho_verify_event_models::{IntervalEvent, PointEvent};
use fho_verify_forecast_models::{ForecastPeriod, ImpactLevel, IssuanceTime};
use fho_verify_spatial::{Coverage, merge_polygons};
use fho_verify_verification_models::{DailyStats, VerificationWindow};

use crate::VerificationDataset;
use crate::classify::{Classification, classify};
use crate::window::resolve_window;

/// Result of verifying one issuance cycle.
#[derive(Debug, Clone)]
pub struct DateEvaluation<'a> {
    /// Issuance date evaluated.
    pub date: NaiveDate,
    /// Window derived from `date`, or `None` if none could be derived.
    pub window: Option<VerificationWindow>,
    /// Number of forecast polygons merged into `coverage`.
    pub polygon_count: usize,
    /// Merged forecast coverage.
    pub coverage: Coverage,
    /// LSR hits and misses.
    pub reports: Classification<'a, PointEvent>,
    /// FFW hits and misses.
    pub warnings: Classification<'a, IntervalEvent>,
}

impl DateEvaluation<'_> {
    /// Whether any forecast polygon was issued for the cycle.
    #[must_use]
    pub const fn forecast_issued(&self) -> bool {
        self.polygon_count > 0
    }

    /// Per-type counts for this date.
    #[must_use]
    pub fn stats(&self) -> DailyStats {
        DailyStats {
            date: self.date,
            forecast_issued: self.forecast_issued(),
            lsr_hits: self.reports.hit_count(),
            lsr_misses: self.reports.miss_count(),
            ffw_hits: self.warnings.hit_count(),
            ffw_misses: self.warnings.miss_count(),
        }
    }
}

/// Verifies one issuance cycle at the given tiers.
///
/// The window is always derived from `date` itself. A cycle with no
/// forecast polygons yields empty classifications (a zero row), not an
/// error.
#[must_use]
pub fn evaluate_date<'a>(
    dataset: &'a VerificationDataset,
    date: NaiveDate,
    issuance: IssuanceTime,
    period: ForecastPeriod,
    tiers: &[ImpactLevel],
) -> DateEvaluation<'a> {
    let window = resolve_window(issuance, period, date);
    let polygons: Vec<_> = dataset
        .cycle_polygons(date, issuance, period, tiers)
        .map(|polygon| &polygon.geometry)
        .collect();

    let (Some(verification_window), false) = (window, polygons.is_empty()) else {
        log::debug!(
            "{date} {issuance} {period}: no forecast polygons or window, zero row",
        );
        return DateEvaluation {
            date,
            window,
            polygon_count: polygons.len(),
            coverage: Coverage::empty(),
            reports: Classification::default(),
            warnings: Classification::default(),
        };
    };

    let coverage = merge_polygons(polygons.iter().copied());
    let reports = classify(dataset.reports(), &verification_window, &coverage);
    let warnings = classify(dataset.warnings(), &verification_window, &coverage);

    log::trace!(
        "{date} {issuance} {period}: {} polygons, LSR {}/{} FFW {}/{}",
        polygons.len(),
        reports.hit_count(),
        reports.miss_count(),
        warnings.hit_count(),
        warnings.miss_count()
    );

    DateEvaluation {
        date,
        window,
        polygon_count: polygons.len(),
        coverage,
        reports,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, day, limited, report, square, warning};

    const LIMITED: &[ImpactLevel] = &[ImpactLevel::Limited];

    fn dataset() -> VerificationDataset {
        VerificationDataset::new(
            vec![
                limited(1, square(-98.0, 35.0, 1.0)),
                limited(1, square(-97.2, 35.0, 1.0)),
            ],
            vec![
                report(-97.5, 35.5, at(2, 10)),
                report(-85.0, 35.5, at(2, 10)),
                report(-97.5, 35.5, at(5, 10)),
            ],
            vec![
                warning(square(-80.0, 30.0, 0.5), at(1, 9), at(1, 10), None),
                warning(square(-96.5, 35.5, 0.2), at(3, 0), at(3, 6), None),
            ],
        )
    }

    #[test]
    fn one_polygon_cycle_scenario() {
        let dataset = dataset();
        let result = evaluate_date(
            &dataset,
            day(1),
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            LIMITED,
        );

        let window = result.window.unwrap();
        assert_eq!(window.start, at(1, 8));
        assert_eq!(window.end, at(4, 8));
        assert_eq!(result.polygon_count, 2);

        let stats = result.stats();
        assert!(stats.forecast_issued);
        assert_eq!(stats.lsr_hits, 1);
        assert_eq!(stats.lsr_misses, 1);
        // 09:00-10:00 on day 1 overlaps the window but is far from the coverage
        assert_eq!(stats.ffw_hits, 1);
        assert_eq!(stats.ffw_misses, 1);
    }

    #[test]
    fn day_without_forecast_is_zero_row() {
        let dataset = dataset();
        let result = evaluate_date(
            &dataset,
            day(2),
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            LIMITED,
        );

        assert!(result.window.is_some());
        assert!(result.coverage.is_empty());
        assert_eq!(result.stats(), DailyStats::zero(day(2), false));
    }

    #[test]
    fn other_tiers_are_ignored() {
        let dataset = dataset();
        let result = evaluate_date(
            &dataset,
            day(1),
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            &[ImpactLevel::Considerable],
        );
        assert_eq!(result.polygon_count, 0);
        assert_eq!(result.stats().hits() + result.stats().misses(), 0);
    }

    #[test]
    fn boundary_events_match_unmerged_polygons() {
        use geo::Intersects;

        let west = square(-110.0, 25.0, 0.5);
        let east = square(-109.5, 25.0, 0.5);
        let dataset = VerificationDataset::new(
            vec![limited(1, west.clone()), limited(1, east.clone())],
            vec![
                // outer west edge
                report(-110.0, 25.25, at(2, 10)),
                // edge shared by both polygons, dissolved by the merge
                report(-109.5, 25.25, at(2, 10)),
                // outer north-east vertex
                report(-109.0, 25.5, at(2, 10)),
                // just outside
                report(-110.01, 25.25, at(2, 10)),
            ],
            vec![
                warning(square(-110.5, 25.0, 0.5), at(2, 0), at(2, 3), None),
                warning(square(-109.0, 25.5, 0.5), at(2, 0), at(2, 3), None),
            ],
        );

        let result = evaluate_date(
            &dataset,
            day(1),
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            LIMITED,
        );
        let stats = result.stats();
        assert_eq!((stats.lsr_hits, stats.lsr_misses), (3, 1));
        assert_eq!((stats.ffw_hits, stats.ffw_misses), (2, 0));

        for report in dataset.reports() {
            let merged_hit = result
                .reports
                .hits
                .iter()
                .any(|hit| std::ptr::eq(*hit, report));
            let unmerged_hit =
                west.intersects(&report.geometry) || east.intersects(&report.geometry);
            assert_eq!(merged_hit, unmerged_hit);
        }
        for warning in dataset.warnings() {
            let merged_hit = result
                .warnings
                .hits
                .iter()
                .any(|hit| std::ptr::eq(*hit, warning));
            let unmerged_hit =
                west.intersects(&warning.geometry) || east.intersects(&warning.geometry);
            assert_eq!(merged_hit, unmerged_hit);
        }
    }
}
