//! R-tree over event envelopes.
//!
//! Built once when the reference tables are loaded. Lookups return the
//! table positions of candidate events whose bounding boxes touch the
//! query; callers still run the exact geometry test on each candidate.

use geo::{MultiPolygon, Point};
use rstar::{AABB, RTree, RTreeObject};

use crate::coverage::multi_polygon_envelope;

/// An indexed item: its position in the source table and its envelope.
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Envelope index over a read-only table of geometries.
#[derive(Debug, Clone)]
pub struct EnvelopeIndex {
    tree: RTree<IndexEntry>,
}

impl EnvelopeIndex {
    /// Indexes a table of points by position.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> Self {
        let entries = points
            .into_iter()
            .enumerate()
            .map(|(position, point)| IndexEntry {
                position,
                envelope: AABB::from_point([point.x(), point.y()]),
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indexes a table of polygons by position. Empty geometries are left
    /// out since they can never intersect anything.
    #[must_use]
    pub fn from_polygons<'a>(polygons: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Self {
        let entries = polygons
            .into_iter()
            .enumerate()
            .filter_map(|(position, mp)| {
                multi_polygon_envelope(mp).map(|envelope| IndexEntry { position, envelope })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Table positions whose envelope intersects the envelope of `area`,
    /// in ascending order.
    #[must_use]
    pub fn candidates(&self, area: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(query_env) = multi_polygon_envelope(area) else {
            return Vec::new();
        };

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_env)
            .map(|entry| entry.position)
            .collect();
        positions.sort_unstable();
        positions
    }
}
