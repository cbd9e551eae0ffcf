//! tour-planner
//!
//! Closed visiting order over a handful of named locations, with road
//! geometry for every leg. Legs come from an OSRM-style routing service,
//! the order from an assignment relaxation over the distance matrix.

pub mod assembler;
pub mod config;
pub mod error;
pub mod haversine;
pub mod location;
pub mod matrix;
pub mod osrm;
pub mod planner;
pub mod polyline;
pub mod solver;
pub mod traits;

pub use error::{ConfigError, OptimizationError, PlannerError, PolylineError, RoutingError};
pub use planner::{Calculation, TourPlanner, select};
