//! Deterministic grid sampling of a neighbourhood boundary.
//!
//! One call produces one category's scored layer. Tiling is anchored at
//! the boundary's bounding-box minimum corner and advances by integer
//! steps, so a fixed boundary, spacing, and POI set always reproduce the
//! same cells in the same order; the layer combiner relies on this.

use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Point, Polygon, Rect};
use rstar::RTree;
use thiserror::Error;

use crate::decay::DecayPolicy;
use crate::poi::Category;

/// Default cell edge length in metres.
pub const DEFAULT_CELL_SIZE_M: f64 = 100.0;

/// One scored square cell in the metric frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Square cell boundary, axis-aligned in the metric frame.
    pub bounds: Polygon<f64>,
    /// Decay score of the cell centre for the layer's category.
    pub score: f64,
}

/// A category's scored grid over one neighbourhood.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLayer {
    /// Category this layer was sampled for.
    pub category: Category,
    /// Surviving cells, row by row from the bounding-box minimum corner.
    pub cells: Vec<GridCell>,
}

/// Errors raised while sampling a grid layer.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// Spacing must be a positive number of metres.
    #[error("cell spacing must be a positive number of metres, got {spacing_m}")]
    InvalidSpacing {
        /// Offending spacing value.
        spacing_m: f64,
    },
    /// The boundary has no bounding box to tile.
    #[error("boundary has no bounding box to sample")]
    EmptyBoundary,
}

/// Sample a scored grid for one category over a metric-frame boundary.
///
/// Cells that do not intersect the boundary are discarded; surviving
/// cells are scored from the distance between their centre and the
/// nearest POI of the category. An empty POI subset scores every cell
/// `0.0`.
///
/// # Errors
/// Returns [`GridError::InvalidSpacing`] for a non-finite or
/// non-positive spacing and [`GridError::EmptyBoundary`] when the
/// boundary has no bounding box.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "bounded metric arithmetic over small cell counts"
)]
pub fn sample_layer(
    category: &Category,
    boundary: &MultiPolygon<f64>,
    spacing_m: f64,
    pois: &[Point<f64>],
    threshold_m: f64,
    decay: DecayPolicy,
) -> Result<ScoreLayer, GridError> {
    if !(spacing_m.is_finite() && spacing_m > 0.0) {
        return Err(GridError::InvalidSpacing { spacing_m });
    }
    let bbox = boundary.bounding_rect().ok_or(GridError::EmptyBoundary)?;
    let tree = (!pois.is_empty()).then(|| {
        RTree::bulk_load(pois.iter().map(|poi| [poi.x(), poi.y()]).collect())
    });

    let columns = span_steps(bbox.min().x, bbox.max().x, spacing_m);
    let rows = span_steps(bbox.min().y, bbox.max().y, spacing_m);

    let mut cells = Vec::new();
    for row in 0..rows {
        let y = bbox.min().y + (row as f64) * spacing_m;
        for column in 0..columns {
            let x = bbox.min().x + (column as f64) * spacing_m;
            let cell = Rect::new(
                Coord { x, y },
                Coord {
                    x: x + spacing_m,
                    y: y + spacing_m,
                },
            )
            .to_polygon();
            if !cell.intersects(boundary) {
                continue;
            }
            let centre = [x + spacing_m / 2.0, y + spacing_m / 2.0];
            let nearest_m = tree
                .as_ref()
                .and_then(|tree| tree.nearest_neighbor(&centre))
                .map(|hit| f64::hypot(hit[0] - centre[0], hit[1] - centre[1]));
            let score = decay.score(nearest_m, threshold_m);
            cells.push(GridCell {
                bounds: cell,
                score,
            });
        }
    }
    Ok(ScoreLayer {
        category: category.clone(),
        cells,
    })
}

/// Number of `spacing_m`-sized steps covering `min..max`, matching an
/// endpoint-exclusive range.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "cell counts are small and the span is non-negative"
)]
fn span_steps(min: f64, max: f64, spacing_m: f64) -> u64 {
    if max <= min {
        return 0;
    }
    ((max - min) / spacing_m).ceil() as u64
}
