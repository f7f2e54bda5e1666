//! Local metric projection backed by `proj4rs`.
//!
//! All scoring distances are metres in one fixed local CRS. The reference
//! deployment scores Montréal, so the bundled definition is EPSG:32188
//! (NAD83 / MTM zone 8); any comparable local metric CRS can be supplied
//! through [`LocalProjection::new`].

use flaneur_core::{Projection, ProjectionError};
use geo::Point;
use proj4rs::proj::Proj;
use thiserror::Error;

/// Proj definition for WGS84 geographic coordinates.
const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Proj definition for EPSG:32188 (NAD83 / MTM zone 8, Montréal).
const MTM_ZONE_8_DEFINITION: &str = "+proj=tmerc +lat_0=0 +lon_0=-73.5 +k=0.9999 \
     +x_0=304800 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Errors raised while constructing a [`LocalProjection`].
#[derive(Debug, Error)]
pub enum BuildProjectionError {
    /// A proj definition string failed to parse.
    #[error("failed to parse projection definition '{definition}'")]
    Definition {
        /// Offending proj definition.
        definition: String,
        /// Parser failure from `proj4rs`.
        #[source]
        source: proj4rs::errors::Error,
    },
}

/// Converter between WGS84 and one fixed local metric CRS.
#[derive(Debug)]
pub struct LocalProjection {
    geographic: Proj,
    metric: Proj,
}

impl LocalProjection {
    /// Build a projection from a proj definition for the metric CRS.
    ///
    /// # Errors
    /// Returns [`BuildProjectionError::Definition`] when either the WGS84
    /// or the metric definition fails to parse.
    pub fn new(metric_definition: &str) -> Result<Self, BuildProjectionError> {
        Ok(Self {
            geographic: parse_definition(WGS84_DEFINITION)?,
            metric: parse_definition(metric_definition)?,
        })
    }

    /// The reference deployment's CRS: EPSG:32188, NAD83 / MTM zone 8.
    ///
    /// # Errors
    /// Returns [`BuildProjectionError::Definition`] when the bundled
    /// definition fails to parse.
    pub fn mtm_zone_8() -> Result<Self, BuildProjectionError> {
        Self::new(MTM_ZONE_8_DEFINITION)
    }
}

fn parse_definition(definition: &str) -> Result<Proj, BuildProjectionError> {
    Proj::from_proj_string(definition).map_err(|source| BuildProjectionError::Definition {
        definition: definition.to_owned(),
        source,
    })
}

impl Projection for LocalProjection {
    fn to_metric(&self, geographic: Point<f64>) -> Result<Point<f64>, ProjectionError> {
        // Geographic coordinates enter proj4rs in radians.
        let mut position = (geographic.x().to_radians(), geographic.y().to_radians(), 0.0);
        proj4rs::transform::transform(&self.geographic, &self.metric, &mut position)
            .map_err(|source| ProjectionError::new(geographic, source))?;
        Ok(Point::new(position.0, position.1))
    }

    fn to_geographic(&self, metric: Point<f64>) -> Result<Point<f64>, ProjectionError> {
        let mut position = (metric.x(), metric.y(), 0.0);
        proj4rs::transform::transform(&self.metric, &self.geographic, &mut position)
            .map_err(|source| ProjectionError::new(metric, source))?;
        Ok(Point::new(position.0.to_degrees(), position.1.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Place Ville-Marie, downtown Montréal.
    const DOWNTOWN_LON: f64 = -73.5617;
    const DOWNTOWN_LAT: f64 = 45.5089;

    #[fixture]
    fn projection() -> LocalProjection {
        LocalProjection::mtm_zone_8().expect("bundled definition parses")
    }

    #[rstest]
    fn projects_downtown_montreal_into_a_plausible_mtm_frame(projection: LocalProjection) {
        let metric = projection
            .to_metric(Point::new(DOWNTOWN_LON, DOWNTOWN_LAT))
            .expect("project downtown");
        // MTM zone 8 carries a 304 800 m false easting on the -73.5
        // meridian; downtown sits a few kilometres west of it and about
        // 5 000 km north of the equator.
        assert!((250_000.0..350_000.0).contains(&metric.x()), "easting {}", metric.x());
        assert!((4_900_000.0..5_200_000.0).contains(&metric.y()), "northing {}", metric.y());
    }

    #[rstest]
    fn round_trips_within_a_micro_degree(projection: LocalProjection) {
        let original = Point::new(DOWNTOWN_LON, DOWNTOWN_LAT);
        let metric = projection.to_metric(original).expect("to metric");
        let back = projection.to_geographic(metric).expect("back to WGS84");
        assert!((back.x() - original.x()).abs() < 1e-6);
        assert!((back.y() - original.y()).abs() < 1e-6);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "the test checks metric distances directly"
    )]
    fn a_hundredth_of_a_degree_of_latitude_is_about_1_1_km(projection: LocalProjection) {
        let south = projection
            .to_metric(Point::new(DOWNTOWN_LON, 45.50))
            .expect("project south point");
        let north = projection
            .to_metric(Point::new(DOWNTOWN_LON, 45.51))
            .expect("project north point");
        let separation = (north.y() - south.y()).abs();
        assert!(
            (1_050.0..1_170.0).contains(&separation),
            "separation {separation}"
        );
    }

    #[rstest]
    fn rejects_an_unparseable_definition() {
        let err = LocalProjection::new("+proj=not-a-projection")
            .expect_err("bad definition should fail");
        assert!(matches!(err, BuildProjectionError::Definition { .. }));
    }
}
