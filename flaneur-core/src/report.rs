//! Analysis result types returned to the API layer.

use serde::{Deserialize, Serialize};

use crate::poi::Category;
use crate::request::Location;

/// Round to one decimal place for stable report output.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "fixed-point rounding of reported distances and scores"
)]
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One category's contribution to the walkability index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Category this entry reports on.
    pub category: Category,
    /// Decay score in `0.0..=1.0`.
    pub score: f64,
    /// Aggregation weight the category was requested with.
    pub weight: f64,
    /// Distance threshold in metres the category was scored against.
    pub threshold_m: f64,
    /// Distance to the nearest POI in metres, rounded to 0.1 m; `None`
    /// when the category has no POIs.
    pub nearest_distance_m: Option<f64>,
    /// Name of the nearest POI, when known.
    pub nearest_name: Option<String>,
    /// Number of POIs within the threshold.
    pub nearby_count: usize,
}

/// A POI within a category's threshold, reported as rendering evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPoi {
    /// Category of the POI.
    pub category: Category,
    /// Name of the POI, when the dataset provides one.
    pub name: Option<String>,
    /// Distance from the analysis centre in metres, rounded to 0.1 m.
    pub distance_m: f64,
    /// WGS84 position for map rendering.
    pub location: Location,
}

/// The full point analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkabilityResult {
    /// Centre of the analysis.
    pub center: Location,
    /// Walkability index in `0.0..=100.0`, rounded to one decimal place.
    pub index: f64,
    /// Per-category results in the order the categories were requested.
    pub breakdown: Vec<CategoryResult>,
    /// All POIs within their category thresholds, across categories.
    pub nearby_pois: Vec<NearbyPoi>,
    /// Name of the containing neighbourhood, or `"Unknown"`.
    pub neighbourhood: String,
}
