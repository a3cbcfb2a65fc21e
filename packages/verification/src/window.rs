//! Issuance cycle → verification window.
//!
//! | period | start | end |
//! |--------|-------|-----|
//! | 1-3    | D+0   | D+3 |
//! | 4-7    | D+3   | D+7 |
//! | 1-7    | D+0   | D+7 |
//!
//! Both bounds sit at the cycle's anchor time (08:00 for AM, 18:00 for PM).

use chrono::{Days, NaiveDate};
use fho_verify_forecast_models::{ForecastPeriod, ImpactLevel, IssuanceTime};
use fho_verify_verification_models::VerificationWindow;

use crate::VerificationError;

/// Resolves the verification window for an issuance cycle.
///
/// Returns `None` only if the window falls outside chrono's calendar.
#[must_use]
pub fn resolve_window(
    issuance: IssuanceTime,
    period: ForecastPeriod,
    date: NaiveDate,
) -> Option<VerificationWindow> {
    let (start_offset, end_offset) = period.day_offsets();
    let hour = issuance.anchor_hour();

    let start = date
        .checked_add_days(Days::new(start_offset))?
        .and_hms_opt(hour, 0, 0)?;
    let end = date
        .checked_add_days(Days::new(end_offset))?
        .and_hms_opt(hour, 0, 0)?;

    Some(VerificationWindow { start, end })
}

/// Resolves the verification window from a raw period code.
///
/// An unrecognized code yields `None`, which callers treat as "skip".
#[must_use]
pub fn resolve_window_code(
    issuance: IssuanceTime,
    period_code: &str,
    date: NaiveDate,
) -> Option<VerificationWindow> {
    let period = period_code.parse().ok()?;
    resolve_window(issuance, period, date)
}

/// Parses a forecast period code for a request.
///
/// # Errors
///
/// Returns [`VerificationError::UnknownForecastPeriod`] for anything but
/// `1-3`, `4-7` and `1-7`.
pub fn parse_period(code: &str) -> Result<ForecastPeriod, VerificationError> {
    code.trim()
        .parse()
        .map_err(|_| VerificationError::UnknownForecastPeriod(code.to_string()))
}

/// Parses an issuance code (`am`, `pm`, `00Z`, `12Z`) for a request.
///
/// # Errors
///
/// Returns [`VerificationError::UnknownIssuance`] for anything else.
pub fn parse_issuance(code: &str) -> Result<IssuanceTime, VerificationError> {
    code.trim()
        .parse()
        .map_err(|_| VerificationError::UnknownIssuance(code.to_string()))
}

/// Parses an impact tier name for a request.
///
/// # Errors
///
/// Returns [`VerificationError::UnknownImpactLevel`] for anything but the
/// three tier names.
pub fn parse_impact_level(name: &str) -> Result<ImpactLevel, VerificationError> {
    name.trim()
        .parse()
        .map_err(|_| VerificationError::UnknownImpactLevel(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, hour: u32) -> NaiveDateTime {
        d.and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn am_one_to_three_window() {
        let window =
            resolve_window(IssuanceTime::Am, ForecastPeriod::OneToThree, date(2023, 6, 1)).unwrap();
        assert_eq!(window.start, at(date(2023, 6, 1), 8));
        assert_eq!(window.end, at(date(2023, 6, 4), 8));
    }

    #[test]
    fn pm_four_to_seven_window() {
        let window =
            resolve_window(IssuanceTime::Pm, ForecastPeriod::FourToSeven, date(2023, 6, 1))
                .unwrap();
        assert_eq!(window.start, at(date(2023, 6, 4), 18));
        assert_eq!(window.end, at(date(2023, 6, 8), 18));
    }

    #[test]
    fn one_to_seven_crosses_month_end() {
        let window =
            resolve_window(IssuanceTime::Am, ForecastPeriod::OneToSeven, date(2023, 6, 28))
                .unwrap();
        assert_eq!(window.start, at(date(2023, 6, 28), 8));
        assert_eq!(window.end, at(date(2023, 7, 5), 8));
    }

    #[test]
    fn window_end_always_after_start() {
        let mut day = date(2022, 1, 1);
        for _ in 0..400 {
            for issuance in IssuanceTime::all() {
                for period in ForecastPeriod::all() {
                    let window = resolve_window(*issuance, *period, day).unwrap();
                    assert!(window.end > window.start, "{day} {issuance} {period}");
                }
            }
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn four_to_seven_never_touches_first_three_days() {
        let issued = date(2024, 2, 27);
        for issuance in IssuanceTime::all() {
            let window = resolve_window(*issuance, ForecastPeriod::FourToSeven, issued).unwrap();
            let day_three_end = at(date(2024, 3, 1), 0);
            assert!(window.start >= day_three_end);
        }
    }

    #[test]
    fn unknown_period_code_has_no_window() {
        assert!(resolve_window_code(IssuanceTime::Am, "2-5", date(2023, 6, 1)).is_none());
        assert_eq!(
            resolve_window_code(IssuanceTime::Am, "1-3", date(2023, 6, 1)),
            resolve_window(IssuanceTime::Am, ForecastPeriod::OneToThree, date(2023, 6, 1))
        );
    }

    #[test]
    fn parse_errors_name_the_bad_code() {
        let err = parse_period("8-14").unwrap_err();
        assert!(err.to_string().contains("8-14"));
        assert!(matches!(
            parse_issuance("06Z"),
            Err(VerificationError::UnknownIssuance(code)) if code == "06Z"
        ));
        assert_eq!(parse_issuance(" 00Z ").unwrap(), IssuanceTime::Am);
        assert_eq!(
            parse_impact_level("Catastrophic").unwrap(),
            ImpactLevel::Catastrophic
        );
        assert!(matches!(
            parse_impact_level("Severe"),
            Err(VerificationError::UnknownImpactLevel(name)) if name == "Severe"
        ));
    }
}
