//! Command-line interface for Flaneur walkability analyses.
#![forbid(unsafe_code)]

use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use flaneur_core::{AnalysisError, ProjectionError};
use flaneur_data::{BuildProjectionError, DatasetError};
use thiserror::Error;

mod analyse;

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_NEIGHBOURHOOD: &str = "neighbourhood";
pub(crate) const ARG_POIS: &str = "pois";
pub(crate) const ARG_BOUNDARIES: &str = "boundaries";
pub(crate) const ARG_THRESHOLDS: &str = "thresholds";
pub(crate) const ENV_POINT_LAT: &str = "FLANEUR_CMDS_POINT_LAT";
pub(crate) const ENV_POINT_LON: &str = "FLANEUR_CMDS_POINT_LON";
pub(crate) const ENV_AREA_NEIGHBOURHOOD: &str = "FLANEUR_CMDS_AREA_NEIGHBOURHOOD";
pub(crate) const ENV_POINT_THRESHOLDS: &str = "FLANEUR_CMDS_POINT_THRESHOLDS";

/// Default POI dataset location, as produced by the data preparation
/// pipeline.
pub(crate) const DEFAULT_POIS_PATH: &str = "data/processed/pois_all.geojson";
/// Default neighbourhood boundary dataset location.
pub(crate) const DEFAULT_BOUNDARIES_PATH: &str =
    "data/processed/limites-administratives-agglomeration-nad83.geojson";

/// Run the Flaneur CLI with the current process arguments and
/// environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Point(args) => analyse::run_point(args),
        Command::Area(args) => analyse::run_area(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "flaneur",
    about = "Walkability scoring over the prepared POI and boundary datasets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score walkability at a single location.
    Point(analyse::PointArgs),
    /// Build a composite walkability layer for one neighbourhood.
    Area(analyse::AreaArgs),
}

/// Errors emitted by the Flaneur CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing CLI flag.
        field: &'static str,
        /// Environment variable that can supply it instead.
        env: &'static str,
    },
    /// Area analysis needs a target.
    #[error("area analysis needs --neighbourhood or both --lat and --lon")]
    MissingAreaTarget,
    /// A referenced dataset path does not exist.
    #[error("{field} path {path} does not exist")]
    MissingSourceFile {
        /// Dataset flag the path was supplied for.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced dataset path is not a regular file.
    #[error("{field} path {path} is not a file")]
    SourcePathNotFile {
        /// Dataset flag the path was supplied for.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A dataset path could not be inspected.
    #[error("failed to inspect {field} path {path}")]
    InspectSourcePath {
        /// Dataset flag the path was supplied for.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Loading reference data failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The bundled projection definition failed to parse.
    #[error("failed to build the local projection")]
    BuildProjection(#[source] BuildProjectionError),
    /// The POI dataset could not be indexed.
    #[error("failed to index the POI dataset")]
    IndexDataset(#[source] ProjectionError),
    /// The analysis itself failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// Result serialisation failed.
    #[error("failed to serialise analysis output")]
    Serialise(#[source] serde_json::Error),
    /// Writing the analysis output failed.
    #[error("failed to write analysis output")]
    WriteOutput(#[source] std::io::Error),
}

#[cfg(test)]
mod tests;
