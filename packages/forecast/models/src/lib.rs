#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Flood hazard outlook (FHO) forecast polygon types.
//!
//! An FHO is issued twice daily (AM and PM cycles) for three lead windows
//! (days 1-3, 4-7 and 1-7) at three impact tiers. Forecasters draw several
//! adjacent polygons per cycle, so most consumers group polygons by
//! [`CycleKey`] and tier before doing anything spatial with them.

use chrono::NaiveDate;
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which of the two daily issuance cycles produced a forecast.
///
/// Parses `am`/`pm` in any case, plus the synoptic cycle codes used by the
/// web frontend (`00Z` is the morning cycle, `12Z` the evening one).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum IssuanceTime {
    /// Morning issuance, valid from 08:00 local office time.
    #[strum(to_string = "am", serialize = "00Z")]
    Am,
    /// Evening issuance, valid from 18:00 local office time.
    #[strum(to_string = "pm", serialize = "12Z")]
    Pm,
}

impl IssuanceTime {
    /// Hour of day (local forecast-office time) at which this cycle's
    /// verification windows open and close.
    #[must_use]
    pub const fn anchor_hour(self) -> u32 {
        match self {
            Self::Am => 8,
            Self::Pm => 18,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Am, Self::Pm]
    }
}

/// Forecast lead window, as a day range counted from the issuance date.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ForecastPeriod {
    /// Days 1 through 3.
    #[serde(rename = "1-3")]
    #[strum(serialize = "1-3")]
    OneToThree,
    /// Days 4 through 7.
    #[serde(rename = "4-7")]
    #[strum(serialize = "4-7")]
    FourToSeven,
    /// Days 1 through 7.
    #[serde(rename = "1-7")]
    #[strum(serialize = "1-7")]
    OneToSeven,
}

impl ForecastPeriod {
    /// Day offsets `(start, end)` from the issuance date bounding the
    /// verification window. The end offset is exclusive.
    #[must_use]
    pub const fn day_offsets(self) -> (u64, u64) {
        match self {
            Self::OneToThree => (0, 3),
            Self::FourToSeven => (3, 7),
            Self::OneToSeven => (0, 7),
        }
    }

    /// Inclusive calendar-day offsets `(first, last)` covered by this
    /// period, e.g. `(3, 6)` for days 4-7.
    #[must_use]
    pub const fn covered_days(self) -> (u64, u64) {
        let (start, end) = self.day_offsets();
        (start, end - 1)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::OneToThree, Self::FourToSeven, Self::OneToSeven]
    }
}

/// Forecast impact tier.
///
/// The source archive labels the dissolved limited tier `Limited_merged`;
/// it is accepted as an alias of [`ImpactLevel::Limited`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ImpactLevel {
    /// Limited flash flooding impacts.
    #[serde(alias = "Limited_merged")]
    #[strum(to_string = "Limited", serialize = "Limited_merged")]
    Limited,
    /// Considerable flash flooding impacts.
    Considerable,
    /// Catastrophic flash flooding impacts.
    Catastrophic,
}

impl ImpactLevel {
    /// Whether this tier is one of the two high-impact tiers.
    #[must_use]
    pub const fn is_high_impact(self) -> bool {
        matches!(self, Self::Considerable | Self::Catastrophic)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Limited, Self::Considerable, Self::Catastrophic]
    }
}

/// Identifies one issuance cycle: a date, an AM/PM cycle and a lead window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CycleKey {
    /// Issuance date.
    pub date: NaiveDate,
    /// AM or PM issuance.
    pub issuance: IssuanceTime,
    /// Lead window.
    pub period: ForecastPeriod,
}

/// A single forecast polygon as drawn by the forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPolygon {
    /// Date the outlook was issued (the `valid_start` date in the archive).
    pub issuance_date: NaiveDate,
    /// AM or PM issuance.
    pub issuance_time: IssuanceTime,
    /// Lead window this polygon applies to.
    pub forecast_period: ForecastPeriod,
    /// Impact tier.
    pub impact_level: ImpactLevel,
    /// Polygon geometry in geographic (EPSG:4326) coordinates.
    pub geometry: MultiPolygon<f64>,
}

impl ForecastPolygon {
    /// The issuance cycle this polygon belongs to.
    #[must_use]
    pub const fn cycle(&self) -> CycleKey {
        CycleKey {
            date: self.issuance_date,
            issuance: self.issuance_time,
            period: self.forecast_period,
        }
    }

    /// Whether this polygon was issued in the given cycle at one of the
    /// given tiers.
    #[must_use]
    pub fn matches(
        &self,
        date: NaiveDate,
        issuance: IssuanceTime,
        period: ForecastPeriod,
        tiers: &[ImpactLevel],
    ) -> bool {
        self.issuance_date == date
            && self.issuance_time == issuance
            && self.forecast_period == period
            && tiers.contains(&self.impact_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuance_time_parses_cycle_codes() {
        assert_eq!("00Z".parse::<IssuanceTime>().unwrap(), IssuanceTime::Am);
        assert_eq!("12Z".parse::<IssuanceTime>().unwrap(), IssuanceTime::Pm);
        assert_eq!("AM".parse::<IssuanceTime>().unwrap(), IssuanceTime::Am);
        assert_eq!("pm".parse::<IssuanceTime>().unwrap(), IssuanceTime::Pm);
        assert!("noon".parse::<IssuanceTime>().is_err());
        assert_eq!(IssuanceTime::Am.to_string(), "am");
    }

    #[test]
    fn forecast_period_round_trips_wire_codes() {
        for period in ForecastPeriod::all() {
            let parsed: ForecastPeriod = period.to_string().parse().unwrap();
            assert_eq!(parsed, *period);
        }
        assert!("2-5".parse::<ForecastPeriod>().is_err());
    }

    #[test]
    fn covered_days_excludes_window_end() {
        assert_eq!(ForecastPeriod::OneToThree.covered_days(), (0, 2));
        assert_eq!(ForecastPeriod::FourToSeven.covered_days(), (3, 6));
        assert_eq!(ForecastPeriod::OneToSeven.covered_days(), (0, 6));
    }

    #[test]
    fn limited_merged_is_limited() {
        assert_eq!(
            "Limited_merged".parse::<ImpactLevel>().unwrap(),
            ImpactLevel::Limited
        );
        let from_json: ImpactLevel = serde_json::from_str("\"Limited_merged\"").unwrap();
        assert_eq!(from_json, ImpactLevel::Limited);
        assert!(!ImpactLevel::Limited.is_high_impact());
        assert!(ImpactLevel::Catastrophic.is_high_impact());
    }

    #[test]
    fn polygon_matches_cycle_and_tier() {
        let polygon = ForecastPolygon {
            issuance_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            issuance_time: IssuanceTime::Am,
            forecast_period: ForecastPeriod::OneToThree,
            impact_level: ImpactLevel::Considerable,
            geometry: MultiPolygon(vec![]),
        };
        let date = polygon.issuance_date;
        assert!(polygon.matches(
            date,
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            &[ImpactLevel::Considerable, ImpactLevel::Catastrophic],
        ));
        assert!(!polygon.matches(
            date,
            IssuanceTime::Pm,
            ForecastPeriod::OneToThree,
            &[ImpactLevel::Considerable],
        ));
        assert!(!polygon.matches(
            date,
            IssuanceTime::Am,
            ForecastPeriod::OneToThree,
            &[ImpactLevel::Limited],
        ));
    }
}
