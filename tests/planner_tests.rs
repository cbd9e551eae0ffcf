//! End-to-end planner tests with a scripted leg provider.
//!
//! Covers tour closure, the one- and two-stop edge cases, the itinerary label
//! and route assembly failures.

mod fixtures;

use std::sync::Arc;

use tour_planner::assembler::assemble;
use tour_planner::config::PlannerConfig;
use tour_planner::error::PlannerError;
use tour_planner::haversine::HaversineProvider;
use tour_planner::location::{Location, LocationCatalog};
use tour_planner::matrix::{LegCache, MatrixBuilder, MatrixOptions};
use tour_planner::planner::select;
use tour_planner::polyline::DEFAULT_PRECISION;
use tour_planner::solver::Assignment;
use tour_planner::TourPlanner;

use fixtures::{StubProvider, cities, irvine, los_angeles, san_diego, santa_ana};

fn planner(provider: StubProvider) -> TourPlanner<StubProvider> {
    TourPlanner::new(provider, &PlannerConfig::default())
}

// ============================================================================
// Closure
// ============================================================================

#[test]
fn tour_has_one_edge_per_location_and_closes() {
    let locations = cities(6);
    let calculation = planner(StubProvider::new()).calculate(&locations).expect("calculate");
    let legs = &calculation.plan.legs;

    assert_eq!(legs.len(), 6);
    assert_eq!(legs[0].from, legs[5].to);
    for pair in legs.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
    for (leg, stop) in legs.iter().zip(&calculation.plan.tour) {
        assert_eq!(&leg.from, stop);
    }
}

#[test]
fn every_path_runs_from_start_to_end() {
    let locations = cities(5);
    let calculation = planner(StubProvider::new()).calculate(&locations).expect("calculate");

    for leg in &calculation.plan.legs {
        let points = leg.path.points();
        assert_eq!(points.first(), Some(&leg.from.coords()), "{} -> {}", leg.from.name, leg.to.name);
        assert_eq!(points.last(), Some(&leg.to.coords()), "{} -> {}", leg.from.name, leg.to.name);
    }
}

#[test]
fn tour_visits_each_location_once() {
    let locations = cities(8);
    let calculation = planner(StubProvider::new()).calculate(&locations).expect("calculate");

    let mut names: Vec<&str> = calculation.plan.tour.iter().map(|l| l.name.as_str()).collect();
    names.sort_unstable();
    let mut expected: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn single_location_has_no_edges() {
    let provider = StubProvider::new();
    let planner = TourPlanner::new(&provider, &PlannerConfig::default());

    let calculation = planner.calculate(&[los_angeles()]).expect("calculate");

    assert_eq!(provider.calls(), 0);
    assert!(calculation.plan.legs.is_empty());
    assert_eq!(calculation.plan.cost, 0.0);
    assert_eq!(calculation.plan.itinerary, "Los Angeles | Total Distance: 0 meters");
}

#[test]
fn two_locations_are_traversed_forward_and_back() {
    let (a, b) = (los_angeles(), san_diego());
    let provider = StubProvider::new().with_distance(&a, &b, 193_000.0);

    let calculation = planner(provider).calculate(&[a.clone(), b.clone()]).expect("calculate");

    assert_eq!(calculation.assignment.order, vec![1, 0]);
    assert_eq!(calculation.plan.cost, 386_000.0);
    let legs = &calculation.plan.legs;
    assert_eq!(legs.len(), 2);
    assert_eq!((&legs[0].from, &legs[0].to), (&b, &a));
    assert_eq!((&legs[1].from, &legs[1].to), (&a, &b));
    assert_eq!(
        calculation.plan.itinerary,
        "San Diego --> Los Angeles | Total Distance: 386000 meters"
    );
}

#[test]
fn empty_selection_is_rejected() {
    let err = planner(StubProvider::new()).calculate(&[]).expect_err("must fail");
    assert!(matches!(err, PlannerError::NoLocations));
}

// ============================================================================
// Itinerary
// ============================================================================

#[test]
fn itinerary_reports_assignment_cost() {
    let (a, b, c) = (los_angeles(), san_diego(), irvine());
    let provider = StubProvider::new()
        .with_distance(&a, &b, 100.0)
        .with_distance(&a, &c, 150.0)
        .with_distance(&b, &c, 50.0);

    let calculation = planner(provider).calculate(&[a, b, c]).expect("calculate");

    assert_eq!(calculation.assignment.cost, 300.0);
    assert_eq!(calculation.plan.cost, 300.0);
    assert!(calculation.plan.itinerary.ends_with(" | Total Distance: 300 meters"));
    assert_eq!(calculation.plan.itinerary.matches(" --> ").count(), 2);
}

#[test]
fn itinerary_follows_the_order() {
    let locations = cities(4);
    let calculation = planner(StubProvider::new()).calculate(&locations).expect("calculate");

    let expected: Vec<&str> = calculation
        .assignment
        .order
        .iter()
        .map(|&i| locations[i].name.as_str())
        .collect();
    assert!(calculation.plan.itinerary.starts_with(&expected.join(" --> ")));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn select_puts_start_first_and_drops_repeats() {
    let catalog = LocationCatalog::southern_california();

    let selected =
        select(&catalog, "Irvine", &["Malibu", "Irvine", "Ventura", "Malibu"]).expect("select");

    let names: Vec<&str> = selected.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Irvine", "Malibu", "Ventura"]);
}

#[test]
fn unknown_location_is_rejected_before_routing() {
    let provider = StubProvider::new();
    let planner = TourPlanner::new(&provider, &PlannerConfig::default());
    let catalog = LocationCatalog::southern_california();

    let err = planner
        .plan(&catalog, "Los Angeles", &["Irvine", "Las Vegas"])
        .expect_err("must fail");

    assert!(matches!(err, PlannerError::UnknownLocation(name) if name == "Las Vegas"));
    assert_eq!(provider.calls(), 0);
}

#[test]
fn routing_failure_fails_the_calculation() {
    let provider = StubProvider::new().failing_on(&irvine(), &santa_ana());
    let err = planner(provider).calculate(&cities(5)).expect_err("must fail");
    assert!(matches!(err, PlannerError::Routing { .. }));
}

#[test]
fn shared_cache_avoids_repeat_requests() {
    let provider = StubProvider::new();
    let cache = Arc::new(LegCache::new());
    let planner = TourPlanner::new(&provider, &PlannerConfig::default()).with_cache(cache);

    let first = planner.calculate(&cities(4)).expect("calculate");
    let second = planner.calculate(&cities(4)).expect("calculate");

    assert_eq!(provider.calls(), 6);
    assert_eq!(first.plan, second.plan);
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn missing_geometry_is_reported() {
    let builder = MatrixBuilder::new(HaversineProvider::default(), MatrixOptions::default());
    let (_, geometry) = builder.build(&cities(2)).expect("build");
    let assignment = Assignment {
        order: vec![1, 2, 0],
        cost: 0.0,
    };

    let err = assemble(&assignment, &cities(3), &geometry, DEFAULT_PRECISION).expect_err("must fail");

    match err {
        PlannerError::MissingGeometry { from, to } => {
            assert_eq!((from.as_str(), to.as_str()), ("San Diego", "Irvine"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn order_must_match_locations() {
    let builder = MatrixBuilder::new(HaversineProvider::default(), MatrixOptions::default());
    let (_, geometry) = builder.build(&cities(3)).expect("build");

    let short = Assignment {
        order: vec![1, 0],
        cost: 0.0,
    };
    assert!(matches!(
        assemble(&short, &cities(3), &geometry, DEFAULT_PRECISION),
        Err(PlannerError::InvalidOrder(_))
    ));

    let out_of_range = Assignment {
        order: vec![1, 2, 3],
        cost: 0.0,
    };
    assert!(matches!(
        assemble(&out_of_range, &cities(3), &geometry, DEFAULT_PRECISION),
        Err(PlannerError::InvalidOrder(_))
    ));
}

#[test]
fn geojson_has_stops_and_legs() {
    let locations: Vec<Location> = cities(3);
    let calculation = planner(StubProvider::new()).calculate(&locations).expect("calculate");

    let geojson = calculation.plan.to_geojson();

    assert_eq!(geojson["type"], "FeatureCollection");
    assert_eq!(geojson["itinerary"], calculation.plan.itinerary.as_str());
    let features = geojson["features"].as_array().expect("features");
    assert_eq!(features.len(), 6);

    let first_stop = &calculation.plan.tour[0];
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["geometry"]["coordinates"][0], first_stop.lng);
    assert_eq!(features[0]["geometry"]["coordinates"][1], first_stop.lat);
    assert_eq!(features[3]["geometry"]["type"], "LineString");
    assert_eq!(features[3]["properties"]["from"], first_stop.name.as_str());
}
