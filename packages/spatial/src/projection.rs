//! Coordinate reference handling.
//!
//! Everything the engine compares is geographic (EPSG:4326, lon/lat
//! degrees). Polygon unions are computed in spherical Web Mercator
//! (EPSG:3857) so the overlay works on a metric plane, then converted back.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use geo::{Coord, MapCoords, MultiPolygon};

use crate::SpatialError;

/// WGS84 semi-major axis in meters, the sphere radius used by EPSG:3857.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Web Mercator is undefined at the poles; latitudes are clamped here.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Coordinate references the verification data is known to arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// Geographic lon/lat degrees (EPSG:4326 / OGC CRS84).
    #[default]
    Wgs84,
    /// Spherical Web Mercator meters (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Resolves a `GeoJSON` legacy `crs` name such as `EPSG:4326` or
    /// `urn:ogc:def:crs:EPSG::3857`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::UnsupportedCrs`] for any other reference.
    pub fn from_name(name: &str) -> Result<Self, SpatialError> {
        let code = name
            .rsplit(|c: char| c == ':' || c == '/')
            .find(|part| !part.is_empty())
            .unwrap_or_default();

        match code {
            "4326" | "CRS84" => Ok(Self::Wgs84),
            "3857" | "900913" | "3785" => Ok(Self::WebMercator),
            _ => Err(SpatialError::UnsupportedCrs(name.to_string())),
        }
    }
}

/// Converts a lon/lat coordinate to Web Mercator meters.
#[must_use]
pub fn to_mercator(c: Coord<f64>) -> Coord<f64> {
    let lat = c.y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    Coord {
        x: EARTH_RADIUS_M * c.x.to_radians(),
        y: EARTH_RADIUS_M * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Converts a Web Mercator coordinate back to lon/lat degrees.
#[must_use]
pub fn from_mercator(c: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (c.x / EARTH_RADIUS_M).to_degrees(),
        y: (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees(),
    }
}

/// Re-expresses a polygon stored in `crs` in geographic coordinates.
#[must_use]
pub fn to_geographic(geometry: &MultiPolygon<f64>, crs: Crs) -> MultiPolygon<f64> {
    match crs {
        Crs::Wgs84 => geometry.clone(),
        Crs::WebMercator => geometry.map_coords(from_mercator),
    }
}

/// Re-expresses a single coordinate stored in `crs` in geographic
/// coordinates.
#[must_use]
pub fn coord_to_geographic(c: Coord<f64>, crs: Crs) -> Coord<f64> {
    match crs {
        Crs::Wgs84 => c,
        Crs::WebMercator => from_mercator(c),
    }
}
