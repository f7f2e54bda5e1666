//! GeoJSON reference-dataset ingestion.
//!
//! Both datasets are read once at process start. A missing or corrupt
//! file is fatal: the loaders return an error rather than let the process
//! serve partial reference data. Individual features with unusable
//! properties or geometry are skipped with a warning so one stray row
//! cannot poison the dataset.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use flaneur_core::{Category, Neighbourhood, NeighbourhoodSet, PointOfInterest};
use geo::{MultiPolygon, Point};
use geojson::{Feature, FeatureCollection, GeoJson};
use log::{info, warn};
use thiserror::Error;

use crate::fs::open_utf8_file;

const CATEGORY_PROPERTY: &str = "category";
const NAME_PROPERTY: &str = "name";
/// Legacy alias used by the transit stop export.
const LEGACY_NAME_PROPERTY: &str = "stop_name";
/// Legacy alias used by the municipal boundary export.
const LEGACY_NEIGHBOURHOOD_NAME_PROPERTY: &str = "NOM";

/// Errors raised while loading reference datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened or read.
    #[error("failed to read dataset at {path}")]
    Read {
        /// Location of the dataset on disk.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file was not valid GeoJSON.
    #[error("failed to parse GeoJSON dataset at {path}")]
    Parse {
        /// Location of the dataset on disk.
        path: Utf8PathBuf,
        /// Decoder failure from `geojson`.
        #[source]
        source: geojson::Error,
    },
    /// The file parsed but was not a FeatureCollection.
    #[error("dataset at {path} is not a GeoJSON FeatureCollection")]
    NotACollection {
        /// Location of the dataset on disk.
        path: Utf8PathBuf,
    },
    /// The collection contained no usable features.
    #[error("dataset at {path} contains no usable features")]
    Empty {
        /// Location of the dataset on disk.
        path: Utf8PathBuf,
    },
}

/// Load the POI dataset.
///
/// Each feature needs a `category` property, a point geometry in WGS84,
/// and optionally a `name` (with `stop_name` honoured as a legacy
/// alias).
///
/// # Errors
/// Returns [`DatasetError`] when the file is missing, unreadable, not a
/// FeatureCollection, or yields no usable POIs.
pub fn load_pois(path: &Utf8Path) -> Result<Vec<PointOfInterest>, DatasetError> {
    let collection = read_collection(path)?;
    let mut pois = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        poi_from_feature(feature).map_or_else(
            || warn!("skipping POI feature without a usable category or point geometry"),
            |poi| pois.push(poi),
        );
    }
    if pois.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!("loaded {} POIs from {path}", pois.len());
    Ok(pois)
}

/// Load the neighbourhood boundary dataset.
///
/// Each feature needs a `name` property (with `NOM` honoured as a legacy
/// alias) and a Polygon or MultiPolygon geometry in WGS84.
///
/// # Errors
/// Returns [`DatasetError`] when the file is missing, unreadable, not a
/// FeatureCollection, or yields no usable boundaries.
pub fn load_neighbourhoods(path: &Utf8Path) -> Result<NeighbourhoodSet, DatasetError> {
    let collection = read_collection(path)?;
    let mut neighbourhoods = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        neighbourhood_from_feature(feature).map_or_else(
            || warn!("skipping boundary feature without a usable name or polygon geometry"),
            |neighbourhood| neighbourhoods.push(neighbourhood),
        );
    }
    if neighbourhoods.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!(
        "loaded {} neighbourhood boundaries from {path}",
        neighbourhoods.len()
    );
    Ok(NeighbourhoodSet::new(neighbourhoods))
}

fn read_collection(path: &Utf8Path) -> Result<FeatureCollection, DatasetError> {
    let file = open_utf8_file(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let geojson = GeoJson::from_reader(reader).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source: geojson::Error::MalformedJson(source),
    })?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(DatasetError::NotACollection {
            path: path.to_path_buf(),
        }),
    }
}

fn poi_from_feature(feature: &Feature) -> Option<PointOfInterest> {
    let category = Category::new(string_property(feature, CATEGORY_PROPERTY)?).ok()?;
    let name = string_property(feature, NAME_PROPERTY)
        .or_else(|| string_property(feature, LEGACY_NAME_PROPERTY));
    let geometry = feature.geometry.as_ref()?;
    let geojson::Value::Point(position) = &geometry.value else {
        return None;
    };
    let x = position.first().copied()?;
    let y = position.get(1).copied()?;
    Some(PointOfInterest::new(category, name, Point::new(x, y)))
}

fn neighbourhood_from_feature(feature: &Feature) -> Option<Neighbourhood> {
    let name = string_property(feature, NAME_PROPERTY)
        .or_else(|| string_property(feature, LEGACY_NEIGHBOURHOOD_NAME_PROPERTY))?;
    let geometry = feature.geometry.as_ref()?;
    let boundary = match geo::Geometry::<f64>::try_from(geometry.value.clone()).ok()? {
        geo::Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
        geo::Geometry::MultiPolygon(multi) => multi,
        _ => return None,
    };
    Some(Neighbourhood { name, boundary })
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    feature
        .properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
