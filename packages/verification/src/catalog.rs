//! Date listings for the date pickers.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use fho_verify_forecast_models::{CycleKey, ImpactLevel};
use fho_verify_verification_models::{HighImpactCatalog, UnforecastWarning};

use crate::VerificationDataset;

/// Sorted distinct forecast issuance dates.
#[must_use]
pub fn available_dates(dataset: &VerificationDataset) -> Vec<NaiveDate> {
    dataset.forecast_dates().collect()
}

fn cycles_at(dataset: &VerificationDataset, level: ImpactLevel) -> BTreeSet<CycleKey> {
    dataset
        .forecasts()
        .iter()
        .filter(|polygon| polygon.impact_level == level)
        .map(fho_verify_forecast_models::ForecastPolygon::cycle)
        .collect()
}

/// Cycles with Considerable or Catastrophic forecasts, and high-impact
/// warnings issued on dates without any such forecast.
#[must_use]
pub fn high_impact_events(dataset: &VerificationDataset) -> HighImpactCatalog {
    let considerable = cycles_at(dataset, ImpactLevel::Considerable);
    let catastrophic = cycles_at(dataset, ImpactLevel::Catastrophic);

    let forecast_dates: BTreeSet<NaiveDate> = considerable
        .iter()
        .chain(&catastrophic)
        .map(|cycle| cycle.date)
        .collect();

    let mut high_impact_ffws: Vec<UnforecastWarning> = dataset
        .warnings()
        .iter()
        .filter_map(|warning| {
            let tag = warning.severity?;
            let date = warning.issued.date();
            (!forecast_dates.contains(&date)).then(|| UnforecastWarning {
                date,
                tag,
                issued: warning.issued.format("%H:%M:%S").to_string(),
                expired: warning.expired.format("%H:%M:%S").to_string(),
            })
        })
        .collect();
    high_impact_ffws.sort_by_key(|warning| warning.date);

    log::debug!(
        "High-impact catalog: {} considerable cycles, {} catastrophic cycles, {} unforecast warnings",
        considerable.len(),
        catastrophic.len(),
        high_impact_ffws.len()
    );

    HighImpactCatalog {
        considerable_fho: considerable.into_iter().collect(),
        catastrophic_fho: catastrophic.into_iter().collect(),
        high_impact_ffws,
    }
}
