//! Scripted leg provider.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use tour_planner::error::RoutingError;
use tour_planner::haversine::HaversineProvider;
use tour_planner::location::Location;
use tour_planner::polyline::{DEFAULT_PRECISION, Polyline};
use tour_planner::traits::{Leg, LegProvider};

/// Returns scripted distances (falling back to great-circle distance) and a
/// straight two-point geometry from the requested origin to the destination.
#[derive(Debug, Default)]
pub struct StubProvider {
    distances: HashMap<String, f64>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance(mut self, a: &Location, b: &Location, distance: f64) -> Self {
        self.distances.insert(pair(a.coords(), b.coords()), distance);
        self
    }

    pub fn failing_on(mut self, a: &Location, b: &Location) -> Self {
        self.failing.insert(pair(a.coords(), b.coords()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LegProvider for StubProvider {
    fn fetch_leg(&self, from: (f64, f64), to: (f64, f64)) -> Result<Leg, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = pair(from, to);
        if self.failing.contains(&key) {
            return Err(RoutingError::Service {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            });
        }

        let distance = self
            .distances
            .get(&key)
            .copied()
            .unwrap_or_else(|| HaversineProvider::haversine_m(from, to));
        let geometry = Polyline::new(vec![from, to]).encode(DEFAULT_PRECISION);
        Ok(Leg { distance, geometry })
    }
}

fn pair(a: (f64, f64), b: (f64, f64)) -> String {
    let a = format!("{:.6},{:.6}", a.0, a.1);
    let b = format!("{:.6},{:.6}", b.0, b.1);
    if a <= b {
        format!("{};{}", a, b)
    } else {
        format!("{};{}", b, a)
    }
}
