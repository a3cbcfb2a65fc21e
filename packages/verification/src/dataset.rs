//! The immutable reference tables the engine reads from.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fho_verify_event_models::{IntervalEvent, PointEvent};
use fho_verify_forecast_models::{ForecastPeriod, ForecastPolygon, ImpactLevel, IssuanceTime};
use fho_verify_spatial::EnvelopeIndex;

/// Forecast polygons, LSRs and FFWs, loaded once at startup.
///
/// Never mutated after construction, so it can be shared across request
/// threads behind an `Arc` without locking. Construction builds a
/// date index over the forecasts and R-tree indexes over both event
/// tables.
#[derive(Debug)]
pub struct VerificationDataset {
    forecasts: Vec<ForecastPolygon>,
    reports: Vec<PointEvent>,
    warnings: Vec<IntervalEvent>,
    /// issuance date -> positions in `forecasts`
    forecasts_by_date: BTreeMap<NaiveDate, Vec<usize>>,
    report_index: EnvelopeIndex,
    warning_index: EnvelopeIndex,
}

impl VerificationDataset {
    /// Builds the dataset and its indexes.
    #[must_use]
    pub fn new(
        forecasts: Vec<ForecastPolygon>,
        reports: Vec<PointEvent>,
        warnings: Vec<IntervalEvent>,
    ) -> Self {
        let mut forecasts_by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (position, polygon) in forecasts.iter().enumerate() {
            forecasts_by_date
                .entry(polygon.issuance_date)
                .or_default()
                .push(position);
        }

        let report_index = EnvelopeIndex::from_points(reports.iter().map(|r| &r.geometry));
        let warning_index = EnvelopeIndex::from_polygons(warnings.iter().map(|w| &w.geometry));

        log::info!(
            "Verification dataset ready: {} forecast polygons over {} dates, {} LSRs, {} FFWs",
            forecasts.len(),
            forecasts_by_date.len(),
            reports.len(),
            warnings.len()
        );

        Self {
            forecasts,
            reports,
            warnings,
            forecasts_by_date,
            report_index,
            warning_index,
        }
    }

    /// All forecast polygons.
    #[must_use]
    pub fn forecasts(&self) -> &[ForecastPolygon] {
        &self.forecasts
    }

    /// All local storm reports.
    #[must_use]
    pub fn reports(&self) -> &[PointEvent] {
        &self.reports
    }

    /// All flash flood warnings.
    #[must_use]
    pub fn warnings(&self) -> &[IntervalEvent] {
        &self.warnings
    }

    /// Distinct forecast issuance dates, ascending.
    pub fn forecast_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.forecasts_by_date.keys().copied()
    }

    /// Forecast polygons issued on `date`.
    pub fn forecasts_on(&self, date: NaiveDate) -> impl Iterator<Item = &ForecastPolygon> + '_ {
        self.forecasts_by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|&position| &self.forecasts[position])
    }

    /// Forecast polygons for one issuance cycle at any of `tiers`.
    pub fn cycle_polygons<'a>(
        &'a self,
        date: NaiveDate,
        issuance: IssuanceTime,
        period: ForecastPeriod,
        tiers: &'a [ImpactLevel],
    ) -> impl Iterator<Item = &'a ForecastPolygon> + 'a {
        self.forecasts_on(date)
            .filter(move |polygon| polygon.matches(date, issuance, period, tiers))
    }

    /// LSRs whose bounding box touches the bounding box of `area`.
    pub fn reports_near<'a>(
        &'a self,
        area: &geo::MultiPolygon<f64>,
    ) -> impl Iterator<Item = &'a PointEvent> + use<'a> {
        self.report_index
            .candidates(area)
            .into_iter()
            .map(|position| &self.reports[position])
    }

    /// FFWs whose bounding box touches the bounding box of `area`.
    pub fn warnings_near<'a>(
        &'a self,
        area: &geo::MultiPolygon<f64>,
    ) -> impl Iterator<Item = &'a IntervalEvent> + use<'a> {
        self.warning_index
            .candidates(area)
            .into_iter()
            .map(|position| &self.warnings[position])
    }
}
