//! Facade crate for the Flaneur walkability engine.
//!
//! Re-exports the core scoring API and, behind the default-on `data`
//! feature, the GeoJSON dataset loaders, the bundled local projection,
//! and the composite-layer renderer.

#![forbid(unsafe_code)]

pub use flaneur_core::{
    AnalysisError, AreaAnalysis, AreaRequest, AreaTarget, Category, CategoryError, CategoryQuery,
    CategoryResult, CompositeCell, CompositeLayer, DecayPolicy, GridCell, GridError,
    IdentityProjection, Location, NearbyPoi, Neighbourhood, NeighbourhoodSet, OverlayError,
    PointOfInterest, PointRequest, Projection, ProjectionError, QueryError, RequestError,
    ScoreLayer, UNKNOWN_NEIGHBOURHOOD, WalkabilityEngine, WalkabilityResult, combine_layers,
    combine_scores,
};

#[cfg(feature = "data")]
pub use flaneur_data::{
    BuildProjectionError, DatasetError, LocalProjection, layer_to_feature_collection,
    load_neighbourhoods, load_pois,
};
