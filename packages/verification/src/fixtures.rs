//! Shared builders for engine tests. All timestamps fall in June 2023.

use chrono::{NaiveDate, NaiveDateTime};
use fho_verify_event_models::{
    Attributes, FLASH_FLOOD_PHENOMENON, IntervalEvent, PointEvent, SeverityTag,
};
use fho_verify_forecast_models::{ForecastPeriod, ForecastPolygon, ImpactLevel, IssuanceTime};
use geo::{MultiPolygon, Point, polygon};

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
}

pub fn at(d: u32, hour: u32) -> NaiveDateTime {
    day(d).and_hms_opt(hour, 0, 0).unwrap()
}

pub fn square(min_x: f64, min_y: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: min_x, y: min_y),
        (x: min_x + size, y: min_y),
        (x: min_x + size, y: min_y + size),
        (x: min_x, y: min_y + size),
        (x: min_x, y: min_y),
    ]])
}

pub fn report(x: f64, y: f64, valid: NaiveDateTime) -> PointEvent {
    PointEvent {
        valid,
        geometry: Point::new(x, y),
        event: "FLASH FLOOD".to_string(),
        attributes: Attributes::new(),
    }
}

pub fn warning(
    geometry: MultiPolygon<f64>,
    issued: NaiveDateTime,
    expired: NaiveDateTime,
    severity: Option<SeverityTag>,
) -> IntervalEvent {
    IntervalEvent {
        issued,
        expired,
        geometry,
        phenomenon: FLASH_FLOOD_PHENOMENON.to_string(),
        severity,
        attributes: Attributes::new(),
    }
}

pub fn forecast(
    d: u32,
    issuance_time: IssuanceTime,
    forecast_period: ForecastPeriod,
    impact_level: ImpactLevel,
    geometry: MultiPolygon<f64>,
) -> ForecastPolygon {
    ForecastPolygon {
        issuance_date: day(d),
        issuance_time,
        forecast_period,
        impact_level,
        geometry,
    }
}

/// A Limited AM 1-3 forecast polygon.
pub fn limited(d: u32, geometry: MultiPolygon<f64>) -> ForecastPolygon {
    forecast(
        d,
        IssuanceTime::Am,
        ForecastPeriod::OneToThree,
        ImpactLevel::Limited,
        geometry,
    )
}
