//! Core scoring engine for the Flaneur walkability index.
//!
//! The engine turns an immutable POI dataset and a neighbourhood boundary
//! dataset into two analyses:
//!
//! - a **point analysis**: per-category proximity scores aggregated into a
//!   0–100 walkability index, with the nearest POI, the POIs within each
//!   category's threshold, and a per-category breakdown as evidence;
//! - an **area analysis**: a deterministic grid of distance-decay scores
//!   over one neighbourhood, combined into a weighted composite layer for
//!   gradient map rendering.
//!
//! Geometric primitives come from [`geo`]; reprojection is delegated to the
//! [`Projection`] seam so distance thresholds are only ever compared in a
//! local metric frame, never in geographic degrees.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod decay;
pub mod engine;
pub mod grid;
pub mod index;
pub mod neighbourhood;
pub mod overlay;
pub mod poi;
pub mod projection;
pub mod proximity;
pub mod report;
pub mod request;

pub use aggregate::combine_scores;
pub use decay::DecayPolicy;
pub use engine::{AnalysisError, AreaAnalysis, WalkabilityEngine};
pub use grid::{DEFAULT_CELL_SIZE_M, GridCell, GridError, ScoreLayer, sample_layer};
pub use index::{IndexedPoi, NearestPoi, PoiIndex, RankedPoi};
pub use neighbourhood::{Neighbourhood, NeighbourhoodSet, UNKNOWN_NEIGHBOURHOOD};
pub use overlay::{CompositeCell, CompositeLayer, OverlayError, combine_layers};
pub use poi::{Category, CategoryError, PointOfInterest};
pub use projection::{IdentityProjection, Projection, ProjectionError};
pub use proximity::evaluate_category;
pub use report::{CategoryResult, NearbyPoi, WalkabilityResult};
pub use request::{
    AreaRequest, AreaTarget, CategoryQuery, Location, PointRequest, QueryError, RequestError,
};
