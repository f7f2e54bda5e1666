//! Per-category proximity evaluation.
//!
//! Combines the nearest-POI query, the within-threshold query, and the
//! decay score into one category result. Absence of data resolves to
//! sentinel values (score 0, no nearest POI), never an error.

use geo::Point;
use log::{debug, info};

use crate::decay::DecayPolicy;
use crate::index::PoiIndex;
use crate::report::{CategoryResult, NearbyPoi, round_tenth};
use crate::request::{CategoryQuery, Location};

/// Evaluate one category at a metric-frame origin.
///
/// Returns the category's breakdown entry alongside the POIs within its
/// threshold, ready for rendering.
#[must_use]
pub fn evaluate_category(
    index: &PoiIndex,
    origin: Point<f64>,
    query: &CategoryQuery,
    decay: DecayPolicy,
) -> (CategoryResult, Vec<NearbyPoi>) {
    let nearest = index.nearest(query.category(), origin);
    let score = decay.score(
        nearest.as_ref().map(|found| found.distance_m),
        query.threshold_m(),
    );
    nearest.as_ref().map_or_else(
        || debug!("{}: no POIs, score=0.000", query.category()),
        |found| {
            info!(
                "{}: nearest={:.1} m, score={score:.3}",
                query.category(),
                found.distance_m
            );
        },
    );

    let nearby: Vec<NearbyPoi> = index
        .within(query.category(), origin, query.threshold_m())
        .into_iter()
        .map(|ranked| NearbyPoi {
            category: query.category().clone(),
            name: ranked.name,
            distance_m: round_tenth(ranked.distance_m),
            location: Location::new(ranked.geographic.y(), ranked.geographic.x()),
        })
        .collect();
    info!(
        "{}: {} nearby POIs within {} m",
        query.category(),
        nearby.len(),
        query.threshold_m()
    );

    let result = CategoryResult {
        category: query.category().clone(),
        score,
        weight: query.weight(),
        threshold_m: query.threshold_m(),
        nearest_distance_m: nearest.as_ref().map(|found| round_tenth(found.distance_m)),
        nearest_name: nearest.and_then(|found| found.name),
        nearby_count: nearby.len(),
    };
    (result, nearby)
}
