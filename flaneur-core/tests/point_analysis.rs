//! End-to-end point analysis against a synthetic metric-frame dataset.

use std::sync::Arc;

use geo::{MultiPolygon, Point, polygon};
use flaneur_core::{
    Category, IdentityProjection, Location, Neighbourhood, NeighbourhoodSet, PointOfInterest,
    PointRequest, UNKNOWN_NEIGHBOURHOOD, WalkabilityEngine,
};
use rstest::{fixture, rstest};

fn poi(category: &str, name: &str, x: f64, y: f64) -> PointOfInterest {
    PointOfInterest::new(
        Category::new(category).expect("valid category"),
        Some(name.to_owned()),
        Point::new(x, y),
    )
}

#[fixture]
fn engine() -> WalkabilityEngine {
    let pois = vec![
        poi("park", "Parc La Fontaine", 150.0, 0.0),
        poi("park", "Parc Laurier", 40.0, 30.0),
        poi("grocery", "Marche Jean-Talon", 0.0, 0.0),
        poi("transit", "Station Mont-Royal", 120.0, -50.0),
    ];
    let boroughs = NeighbourhoodSet::new(vec![Neighbourhood {
        name: "Le Plateau-Mont-Royal".to_owned(),
        boundary: MultiPolygon::new(vec![polygon![
            (x: -60.0, y: -60.0),
            (x: 60.0, y: -60.0),
            (x: 60.0, y: 60.0),
            (x: -60.0, y: 60.0),
        ]]),
    }]);
    WalkabilityEngine::new(&pois, boroughs, Arc::new(IdentityProjection)).expect("build engine")
}

fn request(categories: &[&str], thresholds: &[f64], weights: &[f64]) -> PointRequest {
    PointRequest {
        location: Location::new(0.0, 0.0),
        categories: categories.iter().map(|&label| label.to_owned()).collect(),
        thresholds: thresholds.to_vec(),
        weights: weights.to_vec(),
    }
}

#[rstest]
fn breakdown_follows_the_requested_category_order(engine: WalkabilityEngine) {
    let result = engine
        .analyse_point(&request(
            &["transit", "park", "grocery"],
            &[400.0, 300.0, 500.0],
            &[1.0, 1.0, 1.0],
        ))
        .expect("analyse point");
    let order: Vec<&str> = result
        .breakdown
        .iter()
        .map(|entry| entry.category.as_str())
        .collect();
    assert_eq!(order, ["transit", "park", "grocery"]);
}

#[rstest]
fn nearest_poi_reporting_prefers_the_closest_of_each_category(engine: WalkabilityEngine) {
    let result = engine
        .analyse_point(&request(&["park"], &[300.0], &[1.0]))
        .expect("analyse point");
    assert_eq!(
        result.breakdown[0].nearest_name.as_deref(),
        Some("Parc Laurier")
    );
    assert_eq!(result.breakdown[0].nearest_distance_m, Some(50.0));
}

#[rstest]
fn nearby_pois_carry_rounded_distances_and_locations(engine: WalkabilityEngine) {
    let result = engine
        .analyse_point(&request(&["park"], &[300.0], &[1.0]))
        .expect("analyse point");
    assert_eq!(result.breakdown[0].nearby_count, 2);
    assert_eq!(result.nearby_pois.len(), 2);
    // Closest first: Parc Laurier at hypot(40, 30) = 50 m.
    assert_eq!(result.nearby_pois[0].distance_m, 50.0);
    assert_eq!(result.nearby_pois[0].location.lon, 40.0);
    assert_eq!(result.nearby_pois[0].location.lat, 30.0);
}

#[rstest]
fn index_matches_the_hand_computed_blend(engine: WalkabilityEngine) {
    // park: 50 m of 300 m -> 0.8333; grocery: 0 m -> 1.0; transit: 130 m
    // of 400 m -> 0.675. Weighted (1, 1, 2): (0.8333 + 1.0 + 1.35) / 4 =
    // 0.7958 -> 79.6.
    let result = engine
        .analyse_point(&request(
            &["park", "grocery", "transit"],
            &[300.0, 500.0, 400.0],
            &[1.0, 1.0, 2.0],
        ))
        .expect("analyse point");
    assert_eq!(result.index, 79.6);
}

#[rstest]
fn result_reports_the_containing_neighbourhood(engine: WalkabilityEngine) {
    let inside = engine
        .analyse_point(&request(&["park"], &[300.0], &[1.0]))
        .expect("analyse point");
    assert_eq!(inside.neighbourhood, "Le Plateau-Mont-Royal");

    let mut outside = request(&["park"], &[300.0], &[1.0]);
    outside.location = Location::new(89.0, 170.0);
    let result = engine.analyse_point(&outside).expect("analyse point");
    assert_eq!(result.neighbourhood, UNKNOWN_NEIGHBOURHOOD);
}

#[rstest]
fn result_serialises_for_the_api_layer(engine: WalkabilityEngine) {
    let result = engine
        .analyse_point(&request(&["park", "grocery"], &[300.0, 500.0], &[1.0, 1.0]))
        .expect("analyse point");
    let rendered = serde_json::to_value(&result).expect("serialise result");
    assert!(rendered["index"].is_number());
    assert_eq!(rendered["breakdown"][0]["category"], "park");
    assert!(rendered["nearby_pois"].is_array());
}
