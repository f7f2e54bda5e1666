//! Reprojection seam between WGS84 and the local metric frame.
//!
//! Distance thresholds are metres, so comparing them against
//! geographic-degree distances is meaningless. Every analysis round-trips
//! through one fixed local metric projection supplied by the caller. The
//! engine consumes this trait and never implements projection maths
//! itself.

use geo::{LineString, MultiPolygon, Point, Polygon};
use thiserror::Error;

/// Error raised when a coordinate cannot be moved between frames.
#[derive(Debug, Error)]
#[error("failed to reproject coordinate ({x}, {y})")]
pub struct ProjectionError {
    /// Easting or longitude of the offending coordinate.
    pub x: f64,
    /// Northing or latitude of the offending coordinate.
    pub y: f64,
    /// Underlying projection library failure.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ProjectionError {
    /// Wrap a projection library failure for the given coordinate.
    #[must_use]
    pub fn new(
        point: Point<f64>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
            source: source.into(),
        }
    }
}

/// Converts coordinates between WGS84 and one fixed local metric frame.
///
/// Implementations must be deterministic and thread-safe: the engine
/// shares one instance across every request for the process lifetime.
pub trait Projection: Send + Sync {
    /// Project a WGS84 point into the metric frame.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] when the coordinate cannot be
    /// projected.
    fn to_metric(&self, geographic: Point<f64>) -> Result<Point<f64>, ProjectionError>;

    /// Project a metric-frame point back to WGS84.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] when the coordinate cannot be
    /// projected.
    fn to_geographic(&self, metric: Point<f64>) -> Result<Point<f64>, ProjectionError>;

    /// Project a WGS84 boundary into the metric frame.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] for the first ring coordinate that
    /// cannot be projected.
    fn boundary_to_metric(
        &self,
        boundary: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, ProjectionError> {
        boundary
            .0
            .iter()
            .map(|polygon| map_polygon(polygon, &|point| self.to_metric(point)))
            .collect::<Result<Vec<_>, _>>()
            .map(MultiPolygon::new)
    }

    /// Project a metric-frame cell polygon back to WGS84.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] for the first ring coordinate that
    /// cannot be projected.
    fn polygon_to_geographic(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, ProjectionError> {
        map_polygon(polygon, &|point| self.to_geographic(point))
    }
}

type PointConverter<'a> = &'a dyn Fn(Point<f64>) -> Result<Point<f64>, ProjectionError>;

fn map_polygon(polygon: &Polygon<f64>, convert: PointConverter<'_>) -> Result<Polygon<f64>, ProjectionError> {
    let exterior = map_ring(polygon.exterior(), convert)?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| map_ring(ring, convert))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn map_ring(ring: &LineString<f64>, convert: PointConverter<'_>) -> Result<LineString<f64>, ProjectionError> {
    ring.points()
        .map(convert)
        .collect::<Result<Vec<Point<f64>>, _>>()
        .map(LineString::from)
}

/// Projection for data already expressed in a planar metric frame.
///
/// Returns coordinates unchanged in both directions. Useful for synthetic
/// datasets whose positions are authored directly in metres, and for
/// keeping engine tests frame-exact.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProjection;

impl Projection for IdentityProjection {
    fn to_metric(&self, geographic: Point<f64>) -> Result<Point<f64>, ProjectionError> {
        Ok(geographic)
    }

    fn to_geographic(&self, metric: Point<f64>) -> Result<Point<f64>, ProjectionError> {
        Ok(metric)
    }
}
