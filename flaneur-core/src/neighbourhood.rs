//! Named neighbourhood boundaries and point location.

use geo::{Contains, MultiPolygon, Point};
use log::warn;

/// Sentinel name reported when no boundary contains a point.
pub const UNKNOWN_NEIGHBOURHOOD: &str = "Unknown";

/// A named boundary in WGS84.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbourhood {
    /// Display name from the boundary dataset.
    pub name: String,
    /// Boundary polygons; a `MultiPolygon` covers island boroughs.
    pub boundary: MultiPolygon<f64>,
}

/// The full set of neighbourhood boundaries, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighbourhoodSet {
    neighbourhoods: Vec<Neighbourhood>,
}

impl NeighbourhoodSet {
    /// Wrap a loaded boundary collection.
    #[must_use]
    pub const fn new(neighbourhoods: Vec<Neighbourhood>) -> Self {
        Self { neighbourhoods }
    }

    /// Number of boundaries in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbourhoods.len()
    }

    /// Whether the set holds no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbourhoods.is_empty()
    }

    /// First boundary containing `point`, if any.
    ///
    /// Boundaries are expected to be disjoint, so "first" is also
    /// "unique" for well-formed datasets.
    #[must_use]
    pub fn locate(&self, point: Point<f64>) -> Option<&Neighbourhood> {
        self.neighbourhoods
            .iter()
            .find(|neighbourhood| neighbourhood.boundary.contains(&point))
    }

    /// Containing boundary name, or the [`UNKNOWN_NEIGHBOURHOOD`]
    /// sentinel.
    ///
    /// An unresolved point is a recoverable condition: it is logged as a
    /// diagnostic and reported through the sentinel, never an error.
    #[must_use]
    pub fn locate_name(&self, point: Point<f64>) -> &str {
        self.locate(point).map_or_else(
            || {
                warn!(
                    "no neighbourhood contains ({}, {})",
                    point.x(),
                    point.y()
                );
                UNKNOWN_NEIGHBOURHOOD
            },
            |neighbourhood| neighbourhood.name.as_str(),
        )
    }

    /// Boundary with the given dataset name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Neighbourhood> {
        self.neighbourhoods
            .iter()
            .find(|neighbourhood| neighbourhood.name == name)
    }
}
