//! Reference-data ingestion and the local projection for Flaneur.
//!
//! The crate owns everything at the edge of the scoring core:
//! - GeoJSON dataset loading for POIs and neighbourhood boundaries,
//!   including the legacy property aliases the municipal exports use;
//! - the [`Projection`](flaneur_core::Projection) implementation backed
//!   by `proj4rs`, bundling EPSG:32188 (NAD83 / MTM zone 8, Montréal);
//! - GeoJSON rendering of composite layers for map display;
//! - capability-scoped filesystem helpers shared with the CLI.

#![forbid(unsafe_code)]

pub mod dataset;
pub mod fs;
pub mod projection;
pub mod render;

pub use dataset::{DatasetError, load_neighbourhoods, load_pois};
pub use projection::{BuildProjectionError, LocalProjection};
pub use render::layer_to_feature_collection;
