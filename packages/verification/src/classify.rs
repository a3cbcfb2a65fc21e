//! Spatial-temporal hit/miss classification.
//!
//! Time and space are independent predicates. An event outside the window
//! is dropped entirely; an in-window event is a hit if it intersects the
//! coverage and a miss otherwise, so the two sets are always disjoint and
//! together equal the in-window events.

use fho_verify_event_models::{IntervalEvent, PointEvent};
use fho_verify_spatial::Coverage;
use fho_verify_verification_models::VerificationWindow;

/// Anything that can be verified against a window and a coverage.
pub trait VerificationEvent {
    /// Whether the event belongs to the window.
    fn in_window(&self, window: &VerificationWindow) -> bool;

    /// Whether the event's geometry touches the coverage.
    fn intersects(&self, coverage: &Coverage) -> bool;
}

impl VerificationEvent for PointEvent {
    fn in_window(&self, window: &VerificationWindow) -> bool {
        window.contains(self.valid)
    }

    fn intersects(&self, coverage: &Coverage) -> bool {
        coverage.intersects_point(&self.geometry)
    }
}

impl VerificationEvent for IntervalEvent {
    fn in_window(&self, window: &VerificationWindow) -> bool {
        window.overlaps(self.issued, self.expired)
    }

    fn intersects(&self, coverage: &Coverage) -> bool {
        coverage.intersects_polygon(&self.geometry)
    }
}

/// Events split into hits and misses, borrowed from the source table in
/// table order.
#[derive(Debug, Clone)]
pub struct Classification<'a, T> {
    /// In-window events intersecting the coverage.
    pub hits: Vec<&'a T>,
    /// In-window events not intersecting the coverage.
    pub misses: Vec<&'a T>,
}

impl<T> Default for Classification<'_, T> {
    fn default() -> Self {
        Self {
            hits: Vec::new(),
            misses: Vec::new(),
        }
    }
}

impl<T> Classification<'_, T> {
    /// Number of hits.
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hits.len() as u64
    }

    /// Number of misses.
    #[must_use]
    pub fn miss_count(&self) -> u64 {
        self.misses.len() as u64
    }
}

/// Classifies `events` against `coverage` over `window`.
pub fn classify<'a, T: VerificationEvent + 'a>(
    events: impl IntoIterator<Item = &'a T>,
    window: &VerificationWindow,
    coverage: &Coverage,
) -> Classification<'a, T> {
    let (hits, misses): (Vec<&'a T>, Vec<&'a T>) = events
        .into_iter()
        .filter(|event| event.in_window(window))
        .partition(|event| event.intersects(coverage));

    Classification { hits, misses }
}
