//! Spatial index over the POI dataset.
//!
//! The original per-request distance-annotation pass over the whole
//! dataset is replaced by per-category R\*-trees in the metric frame,
//! built once when the engine is constructed and shared read-only across
//! requests.

use std::collections::HashMap;

use geo::{BoundingRect, Contains, Distance, Euclidean, MultiPolygon, Point};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::poi::{Category, PointOfInterest};
use crate::projection::{Projection, ProjectionError};

/// A POI resolved into both frames and stored in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoi {
    /// Name carried through for reporting.
    pub name: Option<String>,
    /// WGS84 location for rendering.
    pub geographic: Point<f64>,
    /// Metric-frame location used for distance queries.
    pub metric: Point<f64>,
}

impl RTreeObject for IndexedPoi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.metric.x(), self.metric.y()])
    }
}

impl PointDistance for IndexedPoi {
    #[expect(
        clippy::float_arithmetic,
        reason = "squared Euclidean distance drives tree pruning"
    )]
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.metric.x() - point[0];
        let dy = self.metric.y() - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-POI report for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPoi {
    /// Name of the nearest POI, when known.
    pub name: Option<String>,
    /// Distance in metres from the query origin.
    pub distance_m: f64,
}

/// A POI within a query radius, annotated with its distance.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPoi {
    /// Name of the POI, when known.
    pub name: Option<String>,
    /// WGS84 location for rendering.
    pub geographic: Point<f64>,
    /// Distance in metres from the query origin.
    pub distance_m: f64,
}

/// Read-only per-category spatial index over the full POI dataset.
#[derive(Debug)]
pub struct PoiIndex {
    trees: HashMap<Category, RTree<IndexedPoi>>,
    len: usize,
}

impl PoiIndex {
    /// Project every POI into the metric frame and build per-category
    /// trees.
    ///
    /// # Errors
    /// Returns [`ProjectionError`] when any POI cannot be projected: the
    /// dataset is reference data, and a single bad coordinate means the
    /// process must not serve.
    pub fn build(
        pois: &[PointOfInterest],
        projection: &dyn Projection,
    ) -> Result<Self, ProjectionError> {
        let mut grouped: HashMap<Category, Vec<IndexedPoi>> = HashMap::new();
        for poi in pois {
            let metric = projection.to_metric(poi.location)?;
            grouped.entry(poi.category.clone()).or_default().push(IndexedPoi {
                name: poi.name.clone(),
                geographic: poi.location,
                metric,
            });
        }
        let trees = grouped
            .into_iter()
            .map(|(category, entries)| (category, RTree::bulk_load(entries)))
            .collect();
        Ok(Self {
            trees,
            len: pois.len(),
        })
    }

    /// Number of indexed POIs across all categories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no POIs at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest POI of a category, or `None` when the category is absent.
    #[must_use]
    pub fn nearest(&self, category: &Category, origin: Point<f64>) -> Option<NearestPoi> {
        let tree = self.trees.get(category)?;
        let entry = tree.nearest_neighbor(&[origin.x(), origin.y()])?;
        Some(NearestPoi {
            name: entry.name.clone(),
            distance_m: Euclidean.distance(entry.metric, origin),
        })
    }

    /// All POIs of a category within `radius_m` of `origin`, closest
    /// first (ties broken by name for deterministic output).
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the tree query takes a squared radius"
    )]
    pub fn within(&self, category: &Category, origin: Point<f64>, radius_m: f64) -> Vec<RankedPoi> {
        let Some(tree) = self.trees.get(category) else {
            return Vec::new();
        };
        let mut hits: Vec<RankedPoi> = tree
            .locate_within_distance([origin.x(), origin.y()], radius_m * radius_m)
            .map(|entry| RankedPoi {
                name: entry.name.clone(),
                geographic: entry.geographic,
                distance_m: Euclidean.distance(entry.metric, origin),
            })
            .filter(|ranked| ranked.distance_m <= radius_m)
            .collect();
        hits.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.name.cmp(&b.name))
        });
        hits
    }

    /// Metric-frame locations of a category's POIs inside a boundary.
    ///
    /// The boundary must already be in the metric frame. Candidates come
    /// from the tree's envelope query; the final test is exact
    /// containment. Results are sorted by coordinate so downstream
    /// consumers see a stable order.
    #[must_use]
    pub fn within_boundary(
        &self,
        category: &Category,
        boundary: &MultiPolygon<f64>,
    ) -> Vec<Point<f64>> {
        let Some(tree) = self.trees.get(category) else {
            return Vec::new();
        };
        let Some(bbox) = boundary.bounding_rect() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners(
            [bbox.min().x, bbox.min().y],
            [bbox.max().x, bbox.max().y],
        );
        let mut points: Vec<Point<f64>> = tree
            .locate_in_envelope(&envelope)
            .filter(|entry| boundary.contains(&entry.metric))
            .map(|entry| entry.metric)
            .collect();
        points.sort_by(|a, b| a.x().total_cmp(&b.x()).then_with(|| a.y().total_cmp(&b.y())));
        points
    }
}
