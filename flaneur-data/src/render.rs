//! GeoJSON rendering of composite layers.

use flaneur_core::CompositeLayer;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value};

/// Property carrying each cell's combined score.
const SCORE_PROPERTY: &str = "score";

/// Render a composite layer as a GeoJSON FeatureCollection.
///
/// Each cell becomes a Polygon feature with a `score` property in
/// `0.0..=1.0`. Coordinates are emitted as-is; the engine reprojects the
/// layer to WGS84 before it reaches this function.
#[must_use]
pub fn layer_to_feature_collection(layer: &CompositeLayer) -> FeatureCollection {
    let features = layer
        .cells
        .iter()
        .map(|cell| {
            let mut properties = Map::new();
            properties.insert(SCORE_PROPERTY.to_owned(), Value::from(cell.score));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&cell.bounds))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
