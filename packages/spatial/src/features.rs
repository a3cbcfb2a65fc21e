//! `GeoJSON` conversions in both directions.

use geo::{MapCoords, MultiPolygon, Point};
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::SpatialError;
use crate::projection::{Crs, coord_to_geographic, to_geographic};

/// Reads the legacy `crs` member of a `FeatureCollection`. Collections
/// without one are RFC 7946 geographic coordinates.
///
/// # Errors
///
/// Returns [`SpatialError::UnsupportedCrs`] if the collection names a
/// reference other than geographic or Web Mercator.
pub fn collection_crs(collection: &FeatureCollection) -> Result<Crs, SpatialError> {
    let name = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
        .and_then(|crs| crs.pointer("/properties/name"))
        .and_then(serde_json::Value::as_str);

    name.map_or(Ok(Crs::Wgs84), Crs::from_name)
}

/// Converts a `GeoJSON` geometry into a geographic [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
///
/// # Errors
///
/// Returns an error if the geometry is not polygonal or cannot be
/// converted.
pub fn to_multi_polygon(
    geometry: geojson::Geometry,
    crs: Crs,
) -> Result<MultiPolygon<f64>, SpatialError> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into()?;
    let mp = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        other => {
            return Err(SpatialError::UnsupportedGeometry {
                expected: "Polygon or MultiPolygon",
                found: geometry_kind(&other).to_string(),
            });
        }
    };
    Ok(to_geographic(&mp, crs))
}

/// Converts a `GeoJSON` geometry into a geographic [`Point`]. A
/// single-member `MultiPoint` is accepted as well.
///
/// # Errors
///
/// Returns an error if the geometry is not a point.
pub fn to_point(geometry: geojson::Geometry, crs: Crs) -> Result<Point<f64>, SpatialError> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into()?;
    let point = match geo_geom {
        geo::Geometry::Point(p) => p,
        geo::Geometry::MultiPoint(mp) if mp.0.len() == 1 => mp.0[0],
        other => {
            return Err(SpatialError::UnsupportedGeometry {
                expected: "Point",
                found: geometry_kind(&other).to_string(),
            });
        }
    };
    Ok(point.map_coords(|c| coord_to_geographic(c, crs)))
}

/// Builds a `Feature` from a polygon and its properties.
#[must_use]
pub fn polygon_feature(geometry: &MultiPolygon<f64>, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds a `Feature` from a point and its properties.
#[must_use]
pub fn point_feature(geometry: &Point<f64>, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Wraps features into a `FeatureCollection`.
#[must_use]
pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

const fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
