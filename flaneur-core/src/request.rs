//! Request validation for point and area analyses.
//!
//! Requests arrive from the API layer as parallel arrays: one category,
//! one threshold, and one weight per entry. Validation happens here,
//! before any value reaches the scoring core; the core treats a
//! non-positive threshold as a precondition violation rather than
//! coercing it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::poi::{Category, CategoryError};

/// A geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Location {
    /// Construct a location.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn validate(self) -> Result<Self, RequestError> {
        let valid = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);
        if valid {
            Ok(self)
        } else {
            Err(RequestError::InvalidLocation {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

/// One category's scoring configuration.
///
/// Construction validates the threshold and weight so the scoring core can
/// rely on them. Weight `0.0` keeps the category in the report but removes
/// it from the aggregated index.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryQuery {
    category: Category,
    threshold_m: f64,
    weight: f64,
}

/// Errors returned when a scoring configuration entry is invalid.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    /// Distance thresholds must be finite and positive.
    #[error("threshold for '{category}' must be a positive number of metres, got {threshold_m}")]
    InvalidThreshold {
        /// Category the threshold was supplied for.
        category: Category,
        /// Offending threshold value.
        threshold_m: f64,
    },
    /// Weights must be finite and non-negative.
    #[error("weight for '{category}' must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Category the weight was supplied for.
        category: Category,
        /// Offending weight value.
        weight: f64,
    },
    /// The category label itself failed validation.
    #[error(transparent)]
    Category(#[from] CategoryError),
}

impl CategoryQuery {
    /// Validates and constructs a query.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidThreshold`] for a non-finite or
    /// non-positive threshold and [`QueryError::InvalidWeight`] for a
    /// non-finite or negative weight.
    pub fn new(category: Category, threshold_m: f64, weight: f64) -> Result<Self, QueryError> {
        if !(threshold_m.is_finite() && threshold_m > 0.0) {
            return Err(QueryError::InvalidThreshold {
                category,
                threshold_m,
            });
        }
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(QueryError::InvalidWeight { category, weight });
        }
        Ok(Self {
            category,
            threshold_m,
            weight,
        })
    }

    /// Category this query scores.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// Distance threshold in metres, guaranteed finite and positive.
    #[must_use]
    pub const fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Aggregation weight, guaranteed finite and non-negative.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// Errors returned when a request fails validation.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    /// Parallel request arrays disagree on length.
    #[error(
        "parallel request arrays must match: {categories} categories, \
         {thresholds} thresholds, {weights} weights"
    )]
    MismatchedLengths {
        /// Number of category entries supplied.
        categories: usize,
        /// Number of threshold entries supplied.
        thresholds: usize,
        /// Number of weight entries supplied.
        weights: usize,
    },
    /// Latitude or longitude out of range or non-finite.
    #[error("location ({lat}, {lon}) is not a valid WGS84 coordinate")]
    InvalidLocation {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lon: f64,
    },
    /// A category entry failed validation.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A point analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRequest {
    /// Centre of the analysis.
    pub location: Location,
    /// Category labels, one per entry.
    pub categories: Vec<String>,
    /// Distance thresholds in metres, parallel to `categories`.
    pub thresholds: Vec<f64>,
    /// Aggregation weights, parallel to `categories`.
    pub weights: Vec<f64>,
}

impl PointRequest {
    /// Validate the request into ordered category queries.
    ///
    /// # Errors
    /// Returns [`RequestError`] when the location is out of range, the
    /// parallel arrays disagree on length, or any entry is invalid.
    pub fn validate(&self) -> Result<Vec<CategoryQuery>, RequestError> {
        let _ = self.location.validate()?;
        queries_from_parallel(&self.categories, &self.thresholds, &self.weights)
    }
}

/// Identifies the neighbourhood targeted by an area analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AreaTarget {
    /// A neighbourhood referenced by its dataset name.
    Name(String),
    /// A point whose containing neighbourhood should be analysed.
    Location(Location),
}

/// An area analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRequest {
    /// Neighbourhood to analyse.
    pub target: AreaTarget,
    /// Category labels, one per entry.
    pub categories: Vec<String>,
    /// Distance thresholds in metres, parallel to `categories`.
    pub thresholds: Vec<f64>,
    /// Aggregation weights, parallel to `categories`.
    pub weights: Vec<f64>,
}

impl AreaRequest {
    /// Validate the request into ordered category queries.
    ///
    /// # Errors
    /// Returns [`RequestError`] when a location target is out of range,
    /// the parallel arrays disagree on length, or any entry is invalid.
    pub fn validate(&self) -> Result<Vec<CategoryQuery>, RequestError> {
        if let AreaTarget::Location(location) = &self.target {
            let _ = location.validate()?;
        }
        queries_from_parallel(&self.categories, &self.thresholds, &self.weights)
    }
}

fn queries_from_parallel(
    categories: &[String],
    thresholds: &[f64],
    weights: &[f64],
) -> Result<Vec<CategoryQuery>, RequestError> {
    if categories.len() != thresholds.len() || categories.len() != weights.len() {
        return Err(RequestError::MismatchedLengths {
            categories: categories.len(),
            thresholds: thresholds.len(),
            weights: weights.len(),
        });
    }
    categories
        .iter()
        .zip(thresholds)
        .zip(weights)
        .map(|((label, &threshold_m), &weight)| {
            let category = Category::new(label.as_str()).map_err(QueryError::from)?;
            CategoryQuery::new(category, threshold_m, weight).map_err(RequestError::from)
        })
        .collect()
}
