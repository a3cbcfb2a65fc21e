//! Map layer payloads.
//!
//! Event features echo every source attribute plus a one-line `summary`
//! for the popup.

use fho_verify_event_models::{IntervalEvent, PointEvent};
use fho_verify_server_models::{IbwGeometries, StatsGeometries};
use fho_verify_spatial::Coverage;
use fho_verify_spatial::features::{collection, point_feature, polygon_feature};
use fho_verify_verification::evaluate::DateEvaluation;
use fho_verify_verification::impact::ImpactEvaluation;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};

fn with_summary(attributes: &JsonObject, summary: String) -> JsonObject {
    let mut properties = attributes.clone();
    properties.insert("summary".to_string(), JsonValue::String(summary));
    properties
}

/// Storm report feature.
#[must_use]
pub fn report_feature(report: &PointEvent) -> Feature {
    let mut properties = with_summary(&report.attributes, report.summary());
    properties
        .entry("EVENT")
        .or_insert_with(|| JsonValue::String(report.event.clone()));
    point_feature(&report.geometry, properties)
}

/// Warning feature.
#[must_use]
pub fn warning_feature(warning: &IntervalEvent) -> Feature {
    polygon_feature(
        &warning.geometry,
        with_summary(&warning.attributes, warning.summary()),
    )
}

fn reports(events: &[&PointEvent]) -> FeatureCollection {
    collection(events.iter().copied().map(report_feature).collect())
}

fn warnings(events: &[&IntervalEvent]) -> FeatureCollection {
    collection(events.iter().copied().map(warning_feature).collect())
}

fn type_properties(kind: &str) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("type".to_string(), JsonValue::String(kind.to_string()));
    properties
}

/// Coverage feature with a `null` geometry when nothing was forecast.
fn coverage_feature(coverage: &Coverage, properties: JsonObject) -> Feature {
    if coverage.is_empty() {
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    } else {
        polygon_feature(coverage.geometry(), properties)
    }
}

/// Layers for the stats view of one issuance date.
#[must_use]
pub fn stats_geometries(evaluation: &DateEvaluation<'_>) -> StatsGeometries {
    let fho = if evaluation.coverage.is_empty() {
        GeoJson::FeatureCollection(collection(Vec::new()))
    } else {
        GeoJson::Feature(polygon_feature(
            evaluation.coverage.geometry(),
            JsonObject::new(),
        ))
    };

    StatsGeometries {
        fho,
        lsrs_hit: reports(&evaluation.reports.hits),
        lsrs_miss: reports(&evaluation.reports.misses),
        ffws_hit: warnings(&evaluation.warnings.hits),
        ffws_miss: warnings(&evaluation.warnings.misses),
    }
}

/// Layers for the impact-tier view.
#[must_use]
pub fn ibw_geometries(evaluation: &ImpactEvaluation<'_>) -> IbwGeometries {
    let limited = evaluation
        .limited
        .iter()
        .map(|polygon| {
            let mut properties = type_properties("Limited");
            properties.insert(
                "issuance_time".to_string(),
                JsonValue::String(polygon.issuance_time.to_string()),
            );
            properties.insert(
                "forecast_period".to_string(),
                JsonValue::String(polygon.forecast_period.to_string()),
            );
            polygon_feature(&polygon.geometry, properties)
        })
        .collect();

    IbwGeometries {
        fho_considerable: coverage_feature(
            &evaluation.considerable,
            type_properties("Considerable"),
        ),
        fho_catastrophic: coverage_feature(
            &evaluation.catastrophic,
            type_properties("Catastrophic"),
        ),
        limited: collection(limited),
        hits: warnings(&evaluation.hits),
        misses: warnings(&evaluation.misses),
        other_impact: warnings(&evaluation.other_impact),
        no_tag: warnings(&evaluation.no_tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fho_verify_event_models::{Attributes, SeverityTag};
    use geo::{MultiPolygon, Point, polygon};
    use serde_json::json;

    fn report(attributes: Attributes) -> PointEvent {
        PointEvent {
            valid: NaiveDate::from_ymd_opt(2023, 6, 2)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            geometry: Point::new(-97.5, 35.5),
            event: "FLOOD".to_string(),
            attributes,
        }
    }

    #[test]
    fn report_feature_keeps_source_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("CITY".to_string(), json!("Moore"));
        attributes.insert("EVENT".to_string(), json!("FLASH FLOOD"));

        let feature = report_feature(&report(attributes));
        let properties = feature.properties.unwrap();
        assert_eq!(properties["CITY"], "Moore");
        assert_eq!(properties["EVENT"], "FLASH FLOOD");
        assert_eq!(
            properties["summary"],
            "FLOOD at Moore, Unknown (2023-06-02 10:30) reported by Unknown"
        );
    }

    #[test]
    fn report_feature_fills_missing_event() {
        let feature = report_feature(&report(Attributes::new()));
        assert_eq!(feature.properties.unwrap()["EVENT"], "FLOOD");
    }

    #[test]
    fn warning_feature_describes_tag() {
        let warning = IntervalEvent {
            issued: NaiveDate::from_ymd_opt(2023, 6, 2)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap(),
            expired: NaiveDate::from_ymd_opt(2023, 6, 2)
                .unwrap()
                .and_hms_opt(4, 0, 0)
                .unwrap(),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
            phenomenon: "FF".to_string(),
            severity: Some(SeverityTag::Catastrophic),
            attributes: Attributes::new(),
        };

        let properties = warning_feature(&warning).properties.unwrap();
        assert_eq!(
            properties["summary"],
            "Flood warning issued 2023-06-02 01:00 expired 2023-06-02 04:00 (impact: CATASTROPHIC)"
        );
    }

    #[test]
    fn empty_coverage_has_null_geometry() {
        let feature = coverage_feature(&Coverage::empty(), type_properties("Considerable"));
        assert!(feature.geometry.is_none());
        assert_eq!(feature.properties.unwrap()["type"], "Considerable");
    }
}
