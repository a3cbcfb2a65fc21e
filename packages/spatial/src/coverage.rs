//! Merged forecast coverage.

use std::sync::Arc;

use geo::{BoundingRect, Intersects, MapCoords, MultiPolygon, Point, Polygon, unary_union};
use rstar::{AABB, RTree, RTreeObject};

use crate::projection::{from_mercator, to_mercator};

/// One member polygon of a coverage, stored in the R-tree.
#[derive(Debug, Clone)]
struct CoverageEntry {
    envelope: AABB<[f64; 2]>,
    polygon: Polygon<f64>,
}

impl RTreeObject for CoverageEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// The union of all forecast polygons in one cycle, in geographic
/// coordinates.
///
/// Immutable once built. Intersection tests run against the member
/// polygons exactly as they were issued: an event touches the union iff it
/// touches some member, and the members carry no reprojection error. The
/// merged geometry is only used for display and is reference counted so
/// clones share the rings.
#[derive(Debug, Clone)]
pub struct Coverage {
    geometry: Arc<MultiPolygon<f64>>,
    members: RTree<CoverageEntry>,
}

impl Default for Coverage {
    fn default() -> Self {
        Self::empty()
    }
}

impl Coverage {
    /// A coverage containing nothing. Intersects no event.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_geographic(MultiPolygon(Vec::new()))
    }

    /// Wraps an already-merged geographic geometry. Its parts become the
    /// members.
    #[must_use]
    pub fn from_geographic(geometry: MultiPolygon<f64>) -> Self {
        let members = geometry.0.clone();
        Self::build(geometry, members)
    }

    fn build(geometry: MultiPolygon<f64>, members: Vec<Polygon<f64>>) -> Self {
        let entries = members
            .into_iter()
            .map(|polygon| CoverageEntry {
                envelope: polygon_envelope(&polygon),
                polygon,
            })
            .collect();

        Self {
            geometry: Arc::new(geometry),
            members: RTree::bulk_load(entries),
        }
    }

    /// Whether no forecast area was issued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.size() == 0
    }

    /// Number of disjoint polygon parts after merging.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// The merged geometry.
    #[must_use]
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Whether a point lies inside or on the boundary of the coverage.
    #[must_use]
    pub fn intersects_point(&self, point: &Point<f64>) -> bool {
        let query_env = AABB::from_point([point.x(), point.y()]);

        self.members
            .locate_in_envelope_intersecting(&query_env)
            .any(|entry| entry.polygon.intersects(point))
    }

    /// Whether a polygon shares any area or boundary with the coverage.
    #[must_use]
    pub fn intersects_polygon(&self, other: &MultiPolygon<f64>) -> bool {
        let Some(query_env) = multi_polygon_envelope(other) else {
            return false;
        };

        self.members
            .locate_in_envelope_intersecting(&query_env)
            .any(|entry| entry.polygon.intersects(other))
    }

    /// Union of two coverages.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let members: Vec<Polygon<f64>> = self
            .members
            .iter()
            .chain(other.members.iter())
            .map(|entry| entry.polygon.clone())
            .collect();
        Self::build(union_in_mercator(&members), members)
    }
}

/// Merges a set of geographic polygons into one [`Coverage`].
///
/// The display overlay runs in Web Mercator so that it works on a planar
/// metric reference, and the result is converted back to lon/lat. An empty
/// input yields [`Coverage::empty`].
pub fn merge_polygons<'a>(polygons: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Coverage {
    let members: Vec<Polygon<f64>> = polygons
        .into_iter()
        .flat_map(|mp| mp.0.iter().cloned())
        .collect();

    if members.is_empty() {
        return Coverage::empty();
    }

    Coverage::build(union_in_mercator(&members), members)
}

fn union_in_mercator(members: &[Polygon<f64>]) -> MultiPolygon<f64> {
    let projected: Vec<Polygon<f64>> = members
        .iter()
        .map(|polygon| polygon.map_coords(to_mercator))
        .collect();

    let merged = unary_union(&projected);
    log::trace!(
        "Merged {} forecast polygons into {} parts",
        projected.len(),
        merged.0.len()
    );

    merged.map_coords(from_mercator)
}

/// Computes the R-tree envelope of a polygon.
#[must_use]
pub fn polygon_envelope(polygon: &Polygon<f64>) -> AABB<[f64; 2]> {
    polygon.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

/// Computes the R-tree envelope of a multi-polygon, or `None` when empty.
#[must_use]
pub fn multi_polygon_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
