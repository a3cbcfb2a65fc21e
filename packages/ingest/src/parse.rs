//! Feature → record conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fho_verify_event_models::{Attributes, IntervalEvent, PointEvent, SeverityTag};
use fho_verify_forecast_models::{ForecastPolygon, IssuanceTime};
use fho_verify_spatial::Crs;
use fho_verify_spatial::features::{to_multi_polygon, to_point};
use geojson::Feature;
use serde_json::Value;

use crate::IngestError;

/// Naive timestamp layouts seen across the archive.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%d%H%M",
];

/// Parses a timestamp string.
///
/// Every archive time is the forecast-office wall clock exactly as
/// written. A trailing UTC offset is dropped, never applied, so
/// `10:15-05:00` reads as `10:15`.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Only strings carry a wall-clock reading; epoch numbers are rejected.
fn timestamp_value(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_timestamp)
}

fn required<'a>(properties: &'a Attributes, field: &'static str) -> Result<&'a Value, IngestError> {
    properties
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or(IngestError::MissingAttribute { field })
}

fn required_str<'a>(properties: &'a Attributes, field: &'static str) -> Result<&'a str, IngestError> {
    let value = required(properties, field)?;
    value.as_str().ok_or_else(|| IngestError::Attribute {
        field,
        value: value.to_string(),
    })
}

fn required_timestamp(properties: &Attributes, field: &'static str) -> Result<NaiveDateTime, IngestError> {
    let value = required(properties, field)?;
    timestamp_value(value).ok_or_else(|| IngestError::Timestamp {
        field,
        value: value.to_string(),
    })
}

fn parse_attribute<T: std::str::FromStr>(
    properties: &Attributes,
    field: &'static str,
) -> Result<T, IngestError> {
    let raw = required_str(properties, field)?;
    raw.trim().parse().map_err(|_| IngestError::Attribute {
        field,
        value: raw.to_string(),
    })
}

fn split(feature: Feature) -> Result<(geojson::Geometry, Attributes), IngestError> {
    let geometry = feature.geometry.ok_or(IngestError::MissingGeometry)?;
    Ok((geometry, feature.properties.unwrap_or_default()))
}

/// Builds a forecast polygon from an FHO feature.
///
/// The issuance date is the date part of `valid_start`. A missing
/// `issuance_time` falls back to the cycle of the partition.
///
/// # Errors
///
/// * If the geometry is not polygonal
/// * If a required attribute is missing or unparseable
pub fn forecast_polygon(
    feature: Feature,
    crs: Crs,
    partition_issuance: IssuanceTime,
) -> Result<ForecastPolygon, IngestError> {
    let (geometry, properties) = split(feature)?;

    let issuance_time = if properties.get("issuance_time").is_some_and(|v| !v.is_null()) {
        parse_attribute(&properties, "issuance_time")?
    } else {
        partition_issuance
    };

    Ok(ForecastPolygon {
        issuance_date: required_timestamp(&properties, "valid_start")?.date(),
        issuance_time,
        forecast_period: parse_attribute(&properties, "forecast_period")?,
        impact_level: parse_attribute(&properties, "impact_level")?,
        geometry: to_multi_polygon(geometry, crs)?,
    })
}

/// Builds a storm report from an LSR feature.
///
/// # Errors
///
/// * If the geometry is not a point
/// * If `VALID` is missing or unparseable
pub fn point_event(feature: Feature, crs: Crs) -> Result<PointEvent, IngestError> {
    let (geometry, attributes) = split(feature)?;

    let event = ["EVENT", "TYPETEXT"]
        .iter()
        .find_map(|field| attributes.get(*field).and_then(Value::as_str))
        .unwrap_or("FLOOD")
        .to_string();

    Ok(PointEvent {
        valid: required_timestamp(&attributes, "VALID")?,
        geometry: to_point(geometry, crs)?,
        event,
        attributes,
    })
}

/// Builds a warning from a WWA feature. The caller filters on the
/// phenomenon.
///
/// # Errors
///
/// * If the geometry is not polygonal
/// * If `ISSUED`, `EXPIRED` or `PHENOM` are missing or unparseable
pub fn interval_event(feature: Feature, crs: Crs) -> Result<IntervalEvent, IngestError> {
    let (geometry, attributes) = split(feature)?;

    let issued = required_timestamp(&attributes, "ISSUED")?;
    let expired = required_timestamp(&attributes, "EXPIRED")?;
    let phenomenon = required_str(&attributes, "PHENOM")?.trim().to_string();
    let severity = SeverityTag::from_raw(attributes.get("DAMAGTAG").and_then(Value::as_str));

    Ok(IntervalEvent {
        issued,
        expired,
        geometry: to_multi_polygon(geometry, crs)?,
        phenomenon,
        severity,
        attributes,
    })
}
