//! Request-scoped walkability analysis over immutable reference data.

use std::fmt;
use std::sync::Arc;

use geo::Point;
use log::info;
use thiserror::Error;

use crate::aggregate::combine_scores;
use crate::decay::DecayPolicy;
use crate::grid::{self, DEFAULT_CELL_SIZE_M, GridError};
use crate::index::PoiIndex;
use crate::neighbourhood::{Neighbourhood, NeighbourhoodSet, UNKNOWN_NEIGHBOURHOOD};
use crate::overlay::{CompositeCell, CompositeLayer, OverlayError, combine_layers};
use crate::poi::PointOfInterest;
use crate::projection::{Projection, ProjectionError};
use crate::proximity::evaluate_category;
use crate::report::WalkabilityResult;
use crate::request::{AreaRequest, AreaTarget, PointRequest, RequestError};

/// Errors raised while running an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request failed validation before reaching the scoring core.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// A coordinate could not be moved between frames.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// Area analysis referenced a name missing from the boundary dataset.
    #[error("neighbourhood '{name}' is not in the boundary dataset")]
    NeighbourhoodNotFound {
        /// Requested neighbourhood name.
        name: String,
    },
    /// Grid sampling rejected its inputs.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Layer combination rejected its inputs.
    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// The composite overlay for one neighbourhood, reprojected to WGS84.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaAnalysis {
    /// Name of the analysed neighbourhood, or the `"Unknown"` sentinel.
    pub neighbourhood: String,
    /// Weighted composite layer; empty when the target was unresolved.
    pub layer: CompositeLayer,
}

/// Walkability scoring engine over immutable reference data.
///
/// Built once at process start. Every analysis call is a pure function
/// of the request and the datasets, so one engine can be shared across
/// worker threads without locking.
pub struct WalkabilityEngine {
    index: PoiIndex,
    neighbourhoods: NeighbourhoodSet,
    projection: Arc<dyn Projection>,
    decay: DecayPolicy,
    cell_size_m: f64,
}

impl fmt::Debug for WalkabilityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkabilityEngine")
            .field("pois", &self.index.len())
            .field("neighbourhoods", &self.neighbourhoods.len())
            .field("decay", &self.decay)
            .field("cell_size_m", &self.cell_size_m)
            .finish_non_exhaustive()
    }
}

impl WalkabilityEngine {
    /// Index the POI dataset and assemble an engine with linear decay and
    /// the default 100 m cell size.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] when a dataset coordinate cannot be
    /// projected into the metric frame.
    pub fn new(
        pois: &[PointOfInterest],
        neighbourhoods: NeighbourhoodSet,
        projection: Arc<dyn Projection>,
    ) -> Result<Self, ProjectionError> {
        let index = PoiIndex::build(pois, projection.as_ref())?;
        info!(
            "indexed {} POIs and {} neighbourhood boundaries",
            index.len(),
            neighbourhoods.len()
        );
        Ok(Self {
            index,
            neighbourhoods,
            projection,
            decay: DecayPolicy::default(),
            cell_size_m: DEFAULT_CELL_SIZE_M,
        })
    }

    /// Replace the decay policy. The policy is a deployment-wide
    /// constant, not a per-request choice.
    #[must_use]
    pub fn with_decay(mut self, decay: DecayPolicy) -> Self {
        self.decay = decay;
        self
    }

    /// Replace the grid cell edge length in metres.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size_m: f64) -> Self {
        self.cell_size_m = cell_size_m;
        self
    }

    /// Score every requested category at a point and aggregate the
    /// walkability index.
    ///
    /// The origin is projected into the metric frame once; every category
    /// query runs against the prebuilt spatial index. Categories without
    /// POIs score 0 without error, and the containing neighbourhood
    /// resolves to the `"Unknown"` sentinel when no boundary matches.
    ///
    /// # Errors
    /// Returns [`AnalysisError::Request`] for invalid input and
    /// [`AnalysisError::Projection`] when the origin cannot be projected.
    pub fn analyse_point(
        &self,
        request: &PointRequest,
    ) -> Result<WalkabilityResult, AnalysisError> {
        let queries = request.validate()?;
        info!(
            "analysing walkability at lat={}, lon={}",
            request.location.lat, request.location.lon
        );
        let origin_geo = Point::new(request.location.lon, request.location.lat);
        let origin = self.projection.to_metric(origin_geo)?;

        let mut breakdown = Vec::with_capacity(queries.len());
        let mut nearby_pois = Vec::new();
        for query in &queries {
            let (result, nearby) = evaluate_category(&self.index, origin, query, self.decay);
            breakdown.push(result);
            nearby_pois.extend(nearby);
        }
        let index = combine_scores(&breakdown);
        let neighbourhood = self.neighbourhoods.locate_name(origin_geo).to_owned();
        info!(
            "analysis complete: index={index}, {} nearby POIs",
            nearby_pois.len()
        );

        Ok(WalkabilityResult {
            center: request.location,
            index,
            breakdown,
            nearby_pois,
            neighbourhood,
        })
    }

    /// Sample and combine per-category grid layers over one
    /// neighbourhood.
    ///
    /// A location target that no boundary contains reports the
    /// `"Unknown"` sentinel with an empty layer; an unknown name target
    /// is a caller error. The combined layer is reprojected to WGS84 for
    /// rendering.
    ///
    /// # Errors
    /// Returns [`AnalysisError`] for invalid input, an unknown
    /// neighbourhood name, or a coordinate that cannot be reprojected.
    pub fn analyse_area(&self, request: &AreaRequest) -> Result<AreaAnalysis, AnalysisError> {
        let queries = request.validate()?;
        let Some(neighbourhood) = self.resolve_target(&request.target)? else {
            return Ok(AreaAnalysis {
                neighbourhood: UNKNOWN_NEIGHBOURHOOD.to_owned(),
                layer: CompositeLayer::default(),
            });
        };
        info!("analysing neighbourhood '{}'", neighbourhood.name);
        let boundary = self.projection.boundary_to_metric(&neighbourhood.boundary)?;

        let mut layers = Vec::with_capacity(queries.len());
        let mut weights = Vec::with_capacity(queries.len());
        for query in &queries {
            let pois = self.index.within_boundary(query.category(), &boundary);
            let layer = grid::sample_layer(
                query.category(),
                &boundary,
                self.cell_size_m,
                &pois,
                query.threshold_m(),
                self.decay,
            )?;
            info!(
                "built layer for '{}' ({} cells, {} POIs)",
                query.category(),
                layer.cells.len(),
                pois.len()
            );
            layers.push(layer);
            weights.push(query.weight());
        }

        let combined = combine_layers(&layers, &weights)?;
        let cells = combined
            .cells
            .into_iter()
            .map(|cell| {
                self.projection
                    .polygon_to_geographic(&cell.bounds)
                    .map(|bounds| CompositeCell {
                        bounds,
                        score: cell.score,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "neighbourhood layer complete: {} combined cells",
            cells.len()
        );

        Ok(AreaAnalysis {
            neighbourhood: neighbourhood.name.clone(),
            layer: CompositeLayer { cells },
        })
    }

    fn resolve_target(
        &self,
        target: &AreaTarget,
    ) -> Result<Option<&Neighbourhood>, AnalysisError> {
        match target {
            AreaTarget::Name(name) => self
                .neighbourhoods
                .find(name)
                .map(Some)
                .ok_or_else(|| AnalysisError::NeighbourhoodNotFound { name: name.clone() }),
            AreaTarget::Location(location) => Ok(self
                .neighbourhoods
                .locate(Point::new(location.lon, location.lat))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poi::Category;
    use crate::projection::IdentityProjection;
    use crate::request::Location;
    use geo::{MultiPolygon, polygon};
    use rstest::{fixture, rstest};

    fn poi(category: &str, name: &str, x: f64, y: f64) -> PointOfInterest {
        PointOfInterest::new(
            Category::new(category).expect("valid category"),
            Some(name.to_owned()),
            Point::new(x, y),
        )
    }

    fn boroughs() -> NeighbourhoodSet {
        NeighbourhoodSet::new(vec![Neighbourhood {
            name: "Ville-Marie".to_owned(),
            boundary: MultiPolygon::new(vec![polygon![
                (x: -20.0, y: -20.0),
                (x: 60.0, y: -20.0),
                (x: 60.0, y: 60.0),
                (x: -20.0, y: 60.0),
            ]]),
        }])
    }

    #[fixture]
    fn engine() -> WalkabilityEngine {
        let pois = vec![
            poi("park", "Parc La Fontaine", 150.0, 0.0),
            poi("grocery", "Marche Jean-Talon", 0.0, 0.0),
        ];
        WalkabilityEngine::new(&pois, boroughs(), Arc::new(IdentityProjection))
            .expect("build engine")
    }

    fn point_request(weights: &[f64]) -> PointRequest {
        PointRequest {
            location: Location::new(0.0, 0.0),
            categories: vec!["park".to_owned(), "grocery".to_owned()],
            thresholds: vec![300.0, 500.0],
            weights: weights.to_vec(),
        }
    }

    #[rstest]
    fn blends_category_scores_into_the_index(engine: WalkabilityEngine) {
        let result = engine
            .analyse_point(&point_request(&[1.0, 1.0]))
            .expect("analyse point");
        // park: 150 m of 300 m -> 0.5; grocery: 0 m -> 1.0.
        assert_eq!(result.index, 75.0);
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].category.as_str(), "park");
        assert_eq!(result.neighbourhood, "Ville-Marie");
    }

    #[rstest]
    fn zero_weight_categories_stay_in_the_breakdown(engine: WalkabilityEngine) {
        let result = engine
            .analyse_point(&point_request(&[0.0, 1.0]))
            .expect("analyse point");
        assert_eq!(result.index, 100.0);
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].weight, 0.0);
        assert!((result.breakdown[0].score - 0.5).abs() < 1e-9);
    }

    #[rstest]
    fn all_zero_weights_yield_a_zero_index(engine: WalkabilityEngine) {
        let result = engine
            .analyse_point(&point_request(&[0.0, 0.0]))
            .expect("analyse point");
        assert_eq!(result.index, 0.0);
    }

    #[rstest]
    fn reordering_categories_keeps_the_index(engine: WalkabilityEngine) {
        let mut reversed = point_request(&[1.0, 1.0]);
        reversed.categories.reverse();
        reversed.thresholds.reverse();
        reversed.weights.reverse();
        let forward = engine
            .analyse_point(&point_request(&[1.0, 1.0]))
            .expect("analyse point");
        let backward = engine.analyse_point(&reversed).expect("analyse point");
        assert_eq!(forward.index, backward.index);
        assert_eq!(backward.breakdown[0].category.as_str(), "grocery");
    }

    #[rstest]
    fn unknown_categories_score_zero_without_error(engine: WalkabilityEngine) {
        let request = PointRequest {
            location: Location::new(0.0, 0.0),
            categories: vec!["library".to_owned()],
            thresholds: vec![400.0],
            weights: vec![1.0],
        };
        let result = engine.analyse_point(&request).expect("analyse point");
        assert_eq!(result.index, 0.0);
        assert_eq!(result.breakdown[0].nearby_count, 0);
        assert!(result.nearby_pois.is_empty());
    }

    #[rstest]
    fn point_outside_every_boundary_reports_the_sentinel(engine: WalkabilityEngine) {
        let mut request = point_request(&[1.0, 1.0]);
        request.location = Location::new(80.0, 80.0);
        let result = engine.analyse_point(&request).expect("analyse point");
        assert_eq!(result.neighbourhood, UNKNOWN_NEIGHBOURHOOD);
    }

    fn area_request(target: AreaTarget) -> AreaRequest {
        AreaRequest {
            target,
            categories: vec!["park".to_owned(), "grocery".to_owned()],
            thresholds: vec![300.0, 500.0],
            weights: vec![1.0, 1.0],
        }
    }

    #[rstest]
    fn area_analysis_combines_layers_over_the_boundary(engine: WalkabilityEngine) {
        let analysis = engine
            .analyse_area(&area_request(AreaTarget::Name("Ville-Marie".to_owned())))
            .expect("analyse area");
        assert_eq!(analysis.neighbourhood, "Ville-Marie");
        // The 80 m x 80 m boundary with 100 m cells yields one cell.
        assert_eq!(analysis.layer.cells.len(), 1);
        let score = analysis.layer.cells[0].score;
        assert!(score > 0.0 && score <= 1.0);
    }

    #[rstest]
    fn area_analysis_by_location_resolves_the_boundary(engine: WalkabilityEngine) {
        let analysis = engine
            .analyse_area(&area_request(AreaTarget::Location(Location::new(0.0, 0.0))))
            .expect("analyse area");
        assert_eq!(analysis.neighbourhood, "Ville-Marie");
        assert!(!analysis.layer.cells.is_empty());
    }

    #[rstest]
    fn unresolved_location_target_yields_an_empty_layer(engine: WalkabilityEngine) {
        let analysis = engine
            .analyse_area(&area_request(AreaTarget::Location(Location::new(
                80.0, 80.0,
            ))))
            .expect("analyse area");
        assert_eq!(analysis.neighbourhood, UNKNOWN_NEIGHBOURHOOD);
        assert!(analysis.layer.cells.is_empty());
    }

    #[rstest]
    fn unknown_name_target_is_a_caller_error(engine: WalkabilityEngine) {
        let err = engine
            .analyse_area(&area_request(AreaTarget::Name("Atlantis".to_owned())))
            .expect_err("unknown name should fail");
        assert!(matches!(
            err,
            AnalysisError::NeighbourhoodNotFound { name } if name == "Atlantis"
        ));
    }

    #[rstest]
    fn invalid_thresholds_are_rejected_before_scoring(engine: WalkabilityEngine) {
        let mut request = point_request(&[1.0, 1.0]);
        request.thresholds = vec![300.0, -1.0];
        let err = engine
            .analyse_point(&request)
            .expect_err("invalid threshold should fail");
        assert!(matches!(err, AnalysisError::Request(_)));
    }
}
