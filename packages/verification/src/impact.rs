//! Impact-tier validation against warning damage tags.
//!
//! Considerable or Catastrophic forecast coverage is verified against
//! FFWs carrying the matching `DAMAGTAG`. Catastrophic coverage counts
//! toward Considerable, since anywhere forecast catastrophic is at least
//! considerable. Warnings tagged with the other tier and untagged warnings
//! are bucketed for display and never affect the POD.

use chrono::NaiveDate;
use fho_verify_event_models::{IntervalEvent, SeverityTag};
use fho_verify_forecast_models::{ForecastPeriod, ForecastPolygon, ImpactLevel, IssuanceTime};
use fho_verify_spatial::{Coverage, merge_polygons};
use fho_verify_verification_models::{ImpactStats, VerificationWindow, pod};

use crate::classify::{VerificationEvent, classify};
use crate::window::resolve_window;
use crate::{VerificationDataset, VerificationError};

/// Outcome of one impact-tier validation.
#[derive(Debug, Clone)]
pub struct ImpactEvaluation<'a> {
    /// Tier being verified.
    pub level: ImpactLevel,
    /// Verification window of the cycle.
    pub window: VerificationWindow,
    /// Merged Considerable polygons of the cycle.
    pub considerable: Coverage,
    /// Merged Catastrophic polygons of the cycle.
    pub catastrophic: Coverage,
    /// Coverage the selected tier is verified against.
    pub combined: Coverage,
    /// Limited polygons of the cycle, for context.
    pub limited: Vec<&'a ForecastPolygon>,
    /// Matching-tag warnings intersecting `combined`.
    pub hits: Vec<&'a IntervalEvent>,
    /// Matching-tag warnings outside `combined`. With no coverage at all,
    /// every high-impact warning in the window.
    pub misses: Vec<&'a IntervalEvent>,
    /// Warnings tagged with the other high-impact tier.
    pub other_impact: Vec<&'a IntervalEvent>,
    /// Warnings without a high-impact tag.
    pub no_tag: Vec<&'a IntervalEvent>,
}

impl ImpactEvaluation<'_> {
    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> ImpactStats {
        let hits = self.hits.len() as u64;
        let misses = self.misses.len() as u64;
        let ffws_no_tag = self.no_tag.len() as u64;

        ImpactStats {
            pod: pod(hits, misses),
            hits,
            misses,
            ffws_no_tag,
            total_ffws: hits + misses + ffws_no_tag,
        }
    }
}

/// Validates one issuance cycle at a high-impact tier.
///
/// # Errors
///
/// * [`VerificationError::UnsupportedImpactLevel`] for `Limited`, which
///   has no damage tag to verify against
/// * [`VerificationError::NoVerificationWindow`] if the cycle's window
///   cannot be derived
pub fn evaluate_impact(
    dataset: &VerificationDataset,
    date: NaiveDate,
    issuance: IssuanceTime,
    period: ForecastPeriod,
    level: ImpactLevel,
) -> Result<ImpactEvaluation<'_>, VerificationError> {
    let tag = SeverityTag::for_impact_level(level)
        .ok_or(VerificationError::UnsupportedImpactLevel(level))?;
    let window = resolve_window(issuance, period, date).ok_or(
        VerificationError::NoVerificationWindow {
            date,
            issuance,
            period,
        },
    )?;

    let pool = |tier: ImpactLevel| {
        merge_polygons(
            dataset
                .cycle_polygons(date, issuance, period, std::slice::from_ref(&tier))
                .map(|polygon| &polygon.geometry),
        )
    };
    let considerable = pool(ImpactLevel::Considerable);
    let catastrophic = pool(ImpactLevel::Catastrophic);
    let combined = match tag {
        SeverityTag::Considerable => considerable.union(&catastrophic),
        SeverityTag::Catastrophic => catastrophic.clone(),
    };

    let limited = dataset
        .cycle_polygons(date, issuance, period, &[ImpactLevel::Limited])
        .collect();

    let in_window: Vec<&IntervalEvent> = dataset
        .warnings()
        .iter()
        .filter(|warning| warning.in_window(&window))
        .collect();
    let no_tag: Vec<&IntervalEvent> = in_window
        .iter()
        .copied()
        .filter(|warning| warning.severity.is_none())
        .collect();

    let (hits, misses, other_impact) = if combined.is_empty() {
        let misses = in_window
            .iter()
            .copied()
            .filter(|warning| warning.is_high_impact())
            .collect();
        (Vec::new(), misses, Vec::new())
    } else {
        let matching = in_window
            .iter()
            .copied()
            .filter(|warning| warning.severity == Some(tag));
        let classification = classify(matching, &window, &combined);
        let other_impact = in_window
            .iter()
            .copied()
            .filter(|warning| warning.severity.is_some_and(|other| other != tag))
            .collect();
        (classification.hits, classification.misses, other_impact)
    };

    log::debug!(
        "{date} {issuance} {period} {level}: {} hits, {} misses, {} other tier, {} untagged",
        hits.len(),
        misses.len(),
        other_impact.len(),
        no_tag.len()
    );

    Ok(ImpactEvaluation {
        level,
        window,
        considerable,
        catastrophic,
        combined,
        limited,
        hits,
        misses,
        other_impact,
        no_tag,
    })
}
