#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ground-truth event types used to verify flood hazard outlooks.
//!
//! Two kinds of observations are verified against: point Local Storm
//! Reports (LSRs) and polygon Flash Flood Warnings (FFWs) that are valid
//! over an issue/expire interval. Both keep their raw source attributes
//! so they can be echoed back on map features.

use chrono::NaiveDateTime;
use fho_verify_forecast_models::ImpactLevel;
use geo::{MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Raw attribute bag carried through from the source feature.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// VTEC phenomenon code for flash flood warnings.
pub const FLASH_FLOOD_PHENOMENON: &str = "FF";

/// Damage-threat tag attached to impact-based flash flood warnings.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SeverityTag {
    /// `CONSIDERABLE` damage threat.
    Considerable,
    /// `CATASTROPHIC` damage threat.
    Catastrophic,
}

impl SeverityTag {
    /// The forecast tier this tag verifies.
    #[must_use]
    pub const fn impact_level(self) -> ImpactLevel {
        match self {
            Self::Considerable => ImpactLevel::Considerable,
            Self::Catastrophic => ImpactLevel::Catastrophic,
        }
    }

    /// The tag that verifies a forecast tier. `Limited` has no tag.
    #[must_use]
    pub const fn for_impact_level(level: ImpactLevel) -> Option<Self> {
        match level {
            ImpactLevel::Limited => None,
            ImpactLevel::Considerable => Some(Self::Considerable),
            ImpactLevel::Catastrophic => Some(Self::Catastrophic),
        }
    }

    /// Parses a raw `DAMAGTAG` value. Anything other than the two
    /// high-impact tags (blank, `BASE`, missing) means "no tag".
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim).and_then(|s| s.parse().ok())
    }
}

/// A Local Storm Report of flooding.
#[derive(Debug, Clone, PartialEq)]
pub struct PointEvent {
    /// When the flooding was observed.
    pub valid: NaiveDateTime,
    /// Report location in geographic coordinates.
    pub geometry: Point<f64>,
    /// Event type (e.g. "FLASH FLOOD", "FLOOD").
    pub event: String,
    /// Remaining source attributes (city, state, source, remarks, ...).
    pub attributes: Attributes,
}

impl PointEvent {
    /// One-line human readable description for map popups.
    #[must_use]
    pub fn summary(&self) -> String {
        let city = attribute_str(&self.attributes, "CITY").unwrap_or("Unknown");
        let state = attribute_str(&self.attributes, "STATE").unwrap_or("Unknown");
        let source = attribute_str(&self.attributes, "SOURCE").unwrap_or("Unknown");
        format!(
            "{} at {city}, {state} ({}) reported by {source}",
            self.event,
            self.valid.format("%Y-%m-%d %H:%M")
        )
    }
}

/// A Flash Flood Warning polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEvent {
    /// Issue time.
    pub issued: NaiveDateTime,
    /// Expiration time.
    pub expired: NaiveDateTime,
    /// Warning polygon in geographic coordinates.
    pub geometry: MultiPolygon<f64>,
    /// VTEC phenomenon code.
    pub phenomenon: String,
    /// Damage-threat tag, if any.
    pub severity: Option<SeverityTag>,
    /// Remaining source attributes.
    pub attributes: Attributes,
}

impl IntervalEvent {
    /// Whether this is a flash flood (`FF`) warning.
    #[must_use]
    pub fn is_flash_flood(&self) -> bool {
        self.phenomenon == FLASH_FLOOD_PHENOMENON
    }

    /// Whether the warning carries either high-impact tag.
    #[must_use]
    pub const fn is_high_impact(&self) -> bool {
        self.severity.is_some()
    }

    /// One-line human readable description for map popups.
    #[must_use]
    pub fn summary(&self) -> String {
        let impact = self.severity.as_ref().map_or("None", AsRef::as_ref);
        format!(
            "Flood warning issued {} expired {} (impact: {impact})",
            self.issued.format("%Y-%m-%d %H:%M"),
            self.expired.format("%Y-%m-%d %H:%M"),
        )
    }
}

fn attribute_str<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn severity_tag_parses_damage_tags() {
        assert_eq!(
            SeverityTag::from_raw(Some("CONSIDERABLE")),
            Some(SeverityTag::Considerable)
        );
        assert_eq!(
            SeverityTag::from_raw(Some(" catastrophic ")),
            Some(SeverityTag::Catastrophic)
        );
        assert_eq!(SeverityTag::from_raw(Some("BASE")), None);
        assert_eq!(SeverityTag::from_raw(Some("")), None);
        assert_eq!(SeverityTag::from_raw(None), None);
    }

    #[test]
    fn severity_tag_maps_to_impact_level() {
        for tag in [SeverityTag::Considerable, SeverityTag::Catastrophic] {
            assert_eq!(SeverityTag::for_impact_level(tag.impact_level()), Some(tag));
        }
        assert_eq!(SeverityTag::for_impact_level(ImpactLevel::Limited), None);
    }

    #[test]
    fn point_summary_falls_back_to_unknown() {
        let mut attributes = Attributes::new();
        attributes.insert("CITY".to_string(), serde_json::json!("Ellicott City"));
        let report = PointEvent {
            valid: ts(2, 10),
            geometry: Point::new(-76.8, 39.27),
            event: "FLASH FLOOD".to_string(),
            attributes,
        };
        assert_eq!(
            report.summary(),
            "FLASH FLOOD at Ellicott City, Unknown (2023-06-02 10:00) reported by Unknown"
        );
    }

    #[test]
    fn interval_summary_names_tag() {
        let warning = IntervalEvent {
            issued: ts(1, 9),
            expired: ts(1, 12),
            geometry: MultiPolygon(vec![]),
            phenomenon: FLASH_FLOOD_PHENOMENON.to_string(),
            severity: Some(SeverityTag::Considerable),
            attributes: Attributes::new(),
        };
        assert!(warning.is_flash_flood());
        assert!(warning.is_high_impact());
        assert!(warning.summary().ends_with("(impact: CONSIDERABLE)"));
    }
}
