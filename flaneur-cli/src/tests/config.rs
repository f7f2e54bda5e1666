//! Argument parsing and configuration resolution.

use camino::Utf8PathBuf;
use clap::Parser;
use flaneur_core::{AreaTarget, Location};
use rstest::rstest;

use crate::analyse::{AreaArgs, AreaConfig, PointArgs, PointConfig};
use crate::{Cli, CliError, Command, DEFAULT_POIS_PATH};

#[rstest]
fn parses_the_point_subcommand() {
    let cli = Cli::try_parse_from([
        "flaneur",
        "point",
        "--lat",
        "45.5276",
        "--lon",
        "-73.5696",
        "--categories",
        "park,grocery",
        "--thresholds",
        "300,500",
    ])
    .expect("arguments parse");
    let Command::Point(args) = cli.command else {
        panic!("expected the point subcommand");
    };
    assert_eq!(args.lat, Some(45.5276));
    assert_eq!(args.lon, Some(-73.5696));
    assert_eq!(
        args.categories.as_deref(),
        Some(["park".to_owned(), "grocery".to_owned()].as_slice())
    );
    assert_eq!(args.thresholds.as_deref(), Some([300.0, 500.0].as_slice()));
}

#[rstest]
fn point_config_applies_the_stock_category_lists() {
    let args = PointArgs {
        lat: Some(45.5),
        lon: Some(-73.56),
        ..PointArgs::default()
    };
    let config = PointConfig::try_from(args).expect("config resolves");
    assert_eq!(config.categories, ["park", "grocery", "transit"]);
    assert_eq!(config.thresholds, [300.0, 500.0, 400.0]);
    assert_eq!(config.weights, [1.0, 1.0, 1.0]);
    assert_eq!(config.pois, Utf8PathBuf::from(DEFAULT_POIS_PATH));
    assert!(!config.with_layer);
}

#[rstest]
fn point_config_defaults_weights_to_one_per_category() {
    let args = PointArgs {
        lat: Some(45.5),
        lon: Some(-73.56),
        categories: Some(vec!["park".to_owned(), "bixi".to_owned()]),
        thresholds: Some(vec![300.0, 250.0]),
        ..PointArgs::default()
    };
    let config = PointConfig::try_from(args).expect("config resolves");
    assert_eq!(config.weights, [1.0, 1.0]);
}

#[rstest]
fn point_config_requires_coordinates() {
    let err = PointConfig::try_from(PointArgs::default()).expect_err("lat is required");
    assert!(matches!(
        err,
        CliError::MissingArgument { field: "lat", .. }
    ));
}

#[rstest]
fn categories_without_thresholds_are_rejected() {
    let args = PointArgs {
        lat: Some(45.5),
        lon: Some(-73.56),
        categories: Some(vec!["park".to_owned()]),
        ..PointArgs::default()
    };
    let err = PointConfig::try_from(args).expect_err("thresholds are required");
    assert!(matches!(
        err,
        CliError::MissingArgument {
            field: "thresholds",
            ..
        }
    ));
}

#[rstest]
fn area_config_prefers_the_name_target() {
    let args = AreaArgs {
        neighbourhood: Some("Outremont".to_owned()),
        lat: Some(45.5),
        lon: Some(-73.56),
        ..AreaArgs::default()
    };
    let config = AreaConfig::try_from(args).expect("config resolves");
    assert_eq!(config.target, AreaTarget::Name("Outremont".to_owned()));
}

#[rstest]
fn area_config_falls_back_to_a_location_target() {
    let args = AreaArgs {
        lat: Some(45.5),
        lon: Some(-73.56),
        ..AreaArgs::default()
    };
    let config = AreaConfig::try_from(args).expect("config resolves");
    assert_eq!(
        config.target,
        AreaTarget::Location(Location::new(45.5, -73.56))
    );
}

#[rstest]
fn area_config_requires_a_target() {
    let err = AreaConfig::try_from(AreaArgs::default()).expect_err("target is required");
    assert!(matches!(err, CliError::MissingAreaTarget));
}
