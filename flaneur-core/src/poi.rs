//! Categorised points of interest.

use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A POI category label such as `park` or `grocery`.
///
/// Categories are an open set defined by the reference dataset. The newtype
/// guarantees the label is trimmed and non-empty, so configuration lookups
/// never silently miss on stray whitespace.
///
/// # Examples
/// ```
/// use flaneur_core::Category;
///
/// let category = Category::new("park")?;
/// assert_eq!(category.as_str(), "park");
/// # Ok::<(), flaneur_core::CategoryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

/// Errors returned by [`Category::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// The label was empty or whitespace.
    #[error("category label must not be empty")]
    Empty,
}

impl Category {
    /// Validates and constructs a [`Category`].
    ///
    /// # Errors
    /// Returns [`CategoryError::Empty`] when the label is empty or
    /// whitespace.
    pub fn new(label: impl Into<String>) -> Result<Self, CategoryError> {
        let raw = label.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A categorised location loaded from the reference dataset.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Values
/// are immutable once loaded; the engine never mutates the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    /// Category label used for scoring configuration lookups.
    pub category: Category,
    /// Human-readable name, when the dataset provides one.
    pub name: Option<String>,
    /// Geospatial position.
    pub location: Point<f64>,
}

impl PointOfInterest {
    /// Construct a POI.
    #[must_use]
    pub const fn new(category: Category, name: Option<String>, location: Point<f64>) -> Self {
        Self {
            category,
            name,
            location,
        }
    }

    /// Construct a POI without a name.
    #[must_use]
    pub const fn unnamed(category: Category, location: Point<f64>) -> Self {
        Self::new(category, None, location)
    }
}
