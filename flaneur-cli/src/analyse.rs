//! `point` and `area` command implementations.

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use flaneur_core::{AreaRequest, AreaTarget, Location, PointRequest, WalkabilityEngine};
use flaneur_data::fs::{create_utf8_file, ensure_parent_dir, file_is_file};
use flaneur_data::{
    LocalProjection, layer_to_feature_collection, load_neighbourhoods, load_pois,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BOUNDARIES, ARG_LAT, ARG_LON, ARG_NEIGHBOURHOOD, ARG_POIS, ARG_THRESHOLDS, CliError,
    DEFAULT_BOUNDARIES_PATH, DEFAULT_POIS_PATH, ENV_AREA_NEIGHBOURHOOD, ENV_POINT_LAT,
    ENV_POINT_LON, ENV_POINT_THRESHOLDS,
};

const DEFAULT_CATEGORIES: [&str; 3] = ["park", "grocery", "transit"];
const DEFAULT_THRESHOLDS: [f64; 3] = [300.0, 500.0, 400.0];

/// CLI arguments for the `point` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score walkability at a single WGS84 location. Categories, \
                 thresholds, and weights are parallel comma-separated lists; \
                 omitted weights default to 1 per category.",
    about = "Score walkability at a single location"
)]
#[ortho_config(prefix = "FLANEUR")]
pub(crate) struct PointArgs {
    /// Latitude of the point to analyse (WGS84 degrees).
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the point to analyse (WGS84 degrees).
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Comma-separated category labels.
    #[arg(long, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) categories: Option<Vec<String>>,
    /// Comma-separated distance thresholds in metres, parallel to the
    /// categories.
    #[arg(long = ARG_THRESHOLDS, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) thresholds: Option<Vec<f64>>,
    /// Comma-separated aggregation weights, parallel to the categories.
    #[arg(long, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) weights: Option<Vec<f64>>,
    /// Path to the POI dataset (GeoJSON FeatureCollection).
    #[arg(long = ARG_POIS, value_name = "path")]
    #[serde(default)]
    pub(crate) pois: Option<Utf8PathBuf>,
    /// Path to the neighbourhood boundary dataset.
    #[arg(long = ARG_BOUNDARIES, value_name = "path")]
    #[serde(default)]
    pub(crate) boundaries: Option<Utf8PathBuf>,
    /// Also embed the composite layer for the containing neighbourhood.
    #[arg(long)]
    #[serde(default)]
    pub(crate) with_layer: bool,
    /// Write the JSON result here instead of stdout.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PointArgs {
    fn into_config(self) -> Result<PointConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PointConfig::try_from(merged)
    }
}

/// Resolved `point` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PointConfig {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) categories: Vec<String>,
    pub(crate) thresholds: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    pub(crate) pois: Utf8PathBuf,
    pub(crate) boundaries: Utf8PathBuf,
    pub(crate) with_layer: bool,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PointArgs> for PointConfig {
    type Error = CliError;

    fn try_from(args: PointArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_POINT_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_POINT_LON,
        })?;
        let (categories, thresholds, weights) =
            resolve_category_lists(args.categories, args.thresholds, args.weights)?;
        Ok(Self {
            lat,
            lon,
            categories,
            thresholds,
            weights,
            pois: args.pois.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_POIS_PATH)),
            boundaries: args
                .boundaries
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BOUNDARIES_PATH)),
            with_layer: args.with_layer,
            output: args.output,
        })
    }
}

/// CLI arguments for the `area` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Build a composite walkability layer over one neighbourhood, \
                 selected by name or by a contained WGS84 location, and emit \
                 it as a GeoJSON FeatureCollection of scored cells.",
    about = "Build a composite walkability layer for one neighbourhood"
)]
#[ortho_config(prefix = "FLANEUR")]
pub(crate) struct AreaArgs {
    /// Neighbourhood name, as spelled in the boundary dataset.
    #[arg(long = ARG_NEIGHBOURHOOD, value_name = "name")]
    #[serde(default)]
    pub(crate) neighbourhood: Option<String>,
    /// Latitude of a point inside the neighbourhood (WGS84 degrees).
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of a point inside the neighbourhood (WGS84 degrees).
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Comma-separated category labels.
    #[arg(long, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) categories: Option<Vec<String>>,
    /// Comma-separated distance thresholds in metres, parallel to the
    /// categories.
    #[arg(long = ARG_THRESHOLDS, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) thresholds: Option<Vec<f64>>,
    /// Comma-separated aggregation weights, parallel to the categories.
    #[arg(long, value_name = "list", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) weights: Option<Vec<f64>>,
    /// Path to the POI dataset (GeoJSON FeatureCollection).
    #[arg(long = ARG_POIS, value_name = "path")]
    #[serde(default)]
    pub(crate) pois: Option<Utf8PathBuf>,
    /// Path to the neighbourhood boundary dataset.
    #[arg(long = ARG_BOUNDARIES, value_name = "path")]
    #[serde(default)]
    pub(crate) boundaries: Option<Utf8PathBuf>,
    /// Write the GeoJSON layer here instead of stdout.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl AreaArgs {
    fn into_config(self) -> Result<AreaConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AreaConfig::try_from(merged)
    }
}

/// Resolved `area` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AreaConfig {
    pub(crate) target: AreaTarget,
    pub(crate) categories: Vec<String>,
    pub(crate) thresholds: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    pub(crate) pois: Utf8PathBuf,
    pub(crate) boundaries: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<AreaArgs> for AreaConfig {
    type Error = CliError;

    fn try_from(args: AreaArgs) -> Result<Self, Self::Error> {
        let target = match (args.neighbourhood, args.lat, args.lon) {
            (Some(name), _, _) => AreaTarget::Name(name),
            (None, Some(lat), Some(lon)) => AreaTarget::Location(Location::new(lat, lon)),
            _ => return Err(CliError::MissingAreaTarget),
        };
        let (categories, thresholds, weights) =
            resolve_category_lists(args.categories, args.thresholds, args.weights)?;
        Ok(Self {
            target,
            categories,
            thresholds,
            weights,
            pois: args.pois.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_POIS_PATH)),
            boundaries: args
                .boundaries
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BOUNDARIES_PATH)),
            output: args.output,
        })
    }
}

/// Resolve the parallel category lists, applying the stock configuration
/// when none is supplied.
fn resolve_category_lists(
    categories: Option<Vec<String>>,
    thresholds: Option<Vec<f64>>,
    weights: Option<Vec<f64>>,
) -> Result<(Vec<String>, Vec<f64>, Vec<f64>), CliError> {
    let (categories, thresholds) = match (categories, thresholds) {
        (None, None) => (
            DEFAULT_CATEGORIES.iter().map(|&label| label.to_owned()).collect(),
            DEFAULT_THRESHOLDS.to_vec(),
        ),
        (Some(categories), Some(thresholds)) => (categories, thresholds),
        (Some(_), None) | (None, Some(_)) => {
            return Err(CliError::MissingArgument {
                field: ARG_THRESHOLDS,
                env: ENV_POINT_THRESHOLDS,
            });
        }
    };
    let weights = weights.unwrap_or_else(|| vec![1.0; categories.len()]);
    Ok((categories, thresholds, weights))
}

pub(super) fn run_point(args: PointArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_point_with(args, &mut stdout)
}

pub(super) fn run_point_with(args: PointArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_point_config(args)?;
    execute_point(config, writer)
}

pub(crate) fn execute_point(config: PointConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let engine = build_engine(&config.pois, &config.boundaries)?;
    let request = PointRequest {
        location: Location::new(config.lat, config.lon),
        categories: config.categories.clone(),
        thresholds: config.thresholds.clone(),
        weights: config.weights.clone(),
    };
    let result = engine.analyse_point(&request)?;
    let mut payload = serde_json::to_value(&result).map_err(CliError::Serialise)?;

    if config.with_layer {
        let area = engine.analyse_area(&AreaRequest {
            target: AreaTarget::Location(request.location),
            categories: config.categories,
            thresholds: config.thresholds,
            weights: config.weights,
        })?;
        let layer = serde_json::to_value(layer_to_feature_collection(&area.layer))
            .map_err(CliError::Serialise)?;
        if let serde_json::Value::Object(map) = &mut payload {
            map.insert("area_layer".to_owned(), layer);
        }
    }
    write_payload(config.output.as_deref(), &payload, writer)
}

pub(super) fn run_area(args: AreaArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_area_with(args, &mut stdout)
}

pub(super) fn run_area_with(args: AreaArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_area_config(args)?;
    execute_area(config, writer)
}

pub(crate) fn execute_area(config: AreaConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let engine = build_engine(&config.pois, &config.boundaries)?;
    let analysis = engine.analyse_area(&AreaRequest {
        target: config.target.clone(),
        categories: config.categories,
        thresholds: config.thresholds,
        weights: config.weights,
    })?;
    let payload = serde_json::to_value(layer_to_feature_collection(&analysis.layer))
        .map_err(CliError::Serialise)?;
    write_payload(config.output.as_deref(), &payload, writer)
}

fn resolve_point_config(args: PointArgs) -> Result<PointConfig, CliError> {
    let config = args.into_config()?;
    validate_sources(&config.pois, &config.boundaries)?;
    Ok(config)
}

fn resolve_area_config(args: AreaArgs) -> Result<AreaConfig, CliError> {
    let config = args.into_config()?;
    validate_sources(&config.pois, &config.boundaries)?;
    Ok(config)
}

fn validate_sources(pois: &Utf8Path, boundaries: &Utf8Path) -> Result<(), CliError> {
    require_existing(pois, ARG_POIS)?;
    require_existing(boundaries, ARG_BOUNDARIES)?;
    Ok(())
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn build_engine(pois: &Utf8Path, boundaries: &Utf8Path) -> Result<WalkabilityEngine, CliError> {
    let dataset = load_pois(pois)?;
    let neighbourhoods = load_neighbourhoods(boundaries)?;
    let projection = LocalProjection::mtm_zone_8().map_err(CliError::BuildProjection)?;
    WalkabilityEngine::new(&dataset, neighbourhoods, Arc::new(projection))
        .map_err(CliError::IndexDataset)
}

fn write_payload(
    output: Option<&Utf8Path>,
    payload: &serde_json::Value,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CliError::Serialise)?;
    match output {
        Some(path) => {
            ensure_parent_dir(path).map_err(CliError::WriteOutput)?;
            let mut file = create_utf8_file(path).map_err(CliError::WriteOutput)?;
            file.write_all(rendered.as_bytes())
                .map_err(CliError::WriteOutput)?;
            file.write_all(b"\n").map_err(CliError::WriteOutput)?;
        }
        None => {
            writer
                .write_all(rendered.as_bytes())
                .map_err(CliError::WriteOutput)?;
            writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
        }
    }
    Ok(())
}
