#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spatial primitives for forecast verification.
//!
//! Forecasters issue several adjacent polygons per cycle, so verification
//! never tests against individual polygons: they are first merged into a
//! single [`Coverage`] (see [`coverage::merge_polygons`]) which keeps an
//! R-tree over its parts for fast point and polygon intersection tests.
//! The [`index::EnvelopeIndex`] does the reverse job, indexing the event
//! tables so a polygon can find the events it touches without a full scan.

pub mod coverage;
pub mod features;
pub mod index;
pub mod projection;

pub use coverage::{Coverage, merge_polygons};
pub use index::EnvelopeIndex;
pub use projection::Crs;

use thiserror::Error;

/// Errors that can occur while interpreting geometries.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Geometry type is not usable for the requested role.
    #[error("Unsupported geometry: expected {expected}, found {found}")]
    UnsupportedGeometry {
        /// Geometry kind the caller needed.
        expected: &'static str,
        /// Geometry kind that was found.
        found: String,
    },

    /// The collection names a coordinate reference we cannot convert.
    #[error("Unsupported coordinate reference: {0}")]
    UnsupportedCrs(String),

    /// `GeoJSON` to `geo` conversion failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}
