//! Weighted overlay of per-category grid layers.

use geo::Polygon;
use thiserror::Error;

use crate::grid::ScoreLayer;

/// One cell of the combined overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCell {
    /// Cell boundary, copied unchanged from the input layers.
    pub bounds: Polygon<f64>,
    /// Weighted mean score across categories, `0.0..=1.0`.
    pub score: f64,
}

/// The weighted overlay of all category layers over one neighbourhood.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeLayer {
    /// Combined cells, in the shared layer order.
    pub cells: Vec<CompositeCell>,
}

/// Errors raised while combining layers.
#[derive(Debug, Error, PartialEq)]
pub enum OverlayError {
    /// One weight per layer is required.
    #[error("expected one weight per layer: {layers} layers, {weights} weights")]
    WeightCountMismatch {
        /// Number of layers supplied.
        layers: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// Layers must share one cell layout.
    #[error("layer '{category}' has {found} cells where {expected} were expected")]
    CellLayoutMismatch {
        /// Category of the offending layer.
        category: String,
        /// Cell count of the first layer.
        expected: usize,
        /// Cell count of the offending layer.
        found: usize,
    },
}

/// Combine category layers into one weighted composite.
///
/// Cell layouts must be identical across layers, which the grid sampler
/// guarantees by construction when every layer comes from the same
/// boundary and spacing. Per cell, the score is the weighted mean across
/// categories, `0.0` when the total weight is zero. No layers yields an
/// empty composite. Geometry is taken from the first layer.
///
/// # Errors
/// Returns [`OverlayError::WeightCountMismatch`] when the weight count
/// differs from the layer count, and [`OverlayError::CellLayoutMismatch`]
/// when a layer's cell count disagrees with the first layer's.
#[expect(clippy::float_arithmetic, reason = "weighted-mean overlay")]
pub fn combine_layers(
    layers: &[ScoreLayer],
    weights: &[f64],
) -> Result<CompositeLayer, OverlayError> {
    if layers.len() != weights.len() {
        return Err(OverlayError::WeightCountMismatch {
            layers: layers.len(),
            weights: weights.len(),
        });
    }
    let Some(first) = layers.first() else {
        return Ok(CompositeLayer::default());
    };
    for layer in layers {
        if layer.cells.len() != first.cells.len() {
            return Err(OverlayError::CellLayoutMismatch {
                category: layer.category.to_string(),
                expected: first.cells.len(),
                found: layer.cells.len(),
            });
        }
    }

    let total_weight: f64 = weights.iter().sum();
    let cells = first
        .cells
        .iter()
        .enumerate()
        .map(|(position, cell)| {
            let weighted_sum: f64 = layers
                .iter()
                .zip(weights)
                .filter_map(|(layer, &weight)| {
                    layer.cells.get(position).map(|entry| entry.score * weight)
                })
                .sum();
            let score = if total_weight > 0.0 {
                weighted_sum / total_weight
            } else {
                0.0
            };
            CompositeCell {
                bounds: cell.bounds.clone(),
                score,
            }
        })
        .collect();
    Ok(CompositeLayer { cells })
}
