//! Haversine leg provider (fallback when no routing server is reachable).
//!
//! Uses great-circle distance with a straight two-point geometry.
//! Less accurate than OSRM (ignores roads) but always available.

use crate::error::RoutingError;
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::traits::{Leg, LegProvider};

/// Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Straight-line leg provider.
#[derive(Debug, Clone)]
pub struct HaversineProvider {
    /// Multiplier applied to the great-circle distance to approximate road
    /// distance. 1.0 yields the plain great-circle distance.
    pub detour_factor: f64,
    /// Precision of the emitted geometry.
    pub precision: u32,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self {
            detour_factor: 1.0,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl HaversineProvider {
    pub fn new(detour_factor: f64) -> Self {
        Self {
            detour_factor,
            ..Self::default()
        }
    }

    /// Great-circle distance between two points in metres.
    pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl LegProvider for HaversineProvider {
    fn fetch_leg(&self, from: (f64, f64), to: (f64, f64)) -> Result<Leg, RoutingError> {
        let distance = Self::haversine_m(from, to) * self.detour_factor;
        let geometry = Polyline::new(vec![from, to]).encode(self.precision);
        Ok(Leg { distance, geometry })
    }
}
