//! Core seams of the planner.
//!
//! Routing providers and location lookups are injected through these traits so
//! the pipeline never reaches for a concrete HTTP client or a global table.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::location::Location;

/// Result of routing between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Travel distance in metres.
    pub distance: f64,
    /// Path geometry as an encoded polyline.
    pub geometry: String,
}

impl Leg {
    pub fn new(distance: f64, geometry: impl Into<String>) -> Self {
        Self {
            distance,
            geometry: geometry.into(),
        }
    }
}

/// Provides a single leg between two (lat, lng) points.
///
/// Implementations are shared across worker threads while a matrix is built,
/// hence the `Sync` bound.
pub trait LegProvider: Sync {
    fn fetch_leg(&self, from: (f64, f64), to: (f64, f64)) -> Result<Leg, RoutingError>;
}

impl<P: LegProvider + ?Sized> LegProvider for &P {
    fn fetch_leg(&self, from: (f64, f64), to: (f64, f64)) -> Result<Leg, RoutingError> {
        (**self).fetch_leg(from, to)
    }
}

/// Read-only name to location lookup supplied by the surrounding application.
pub trait LocationLookup {
    fn location(&self, name: &str) -> Option<&Location>;
}
