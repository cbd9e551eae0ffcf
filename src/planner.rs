//! One tour calculation: route all pairs, match, assemble.

use std::sync::Arc;

use tracing::{info, warn};

use crate::assembler::{RenderPlan, assemble};
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::location::Location;
use crate::matrix::{DistanceMatrix, LegCache, MatrixBuilder};
use crate::solver::{Assignment, SolveOptions, solve};
use crate::traits::{LegProvider, LocationLookup};

/// Outcome of a successful calculation.
#[derive(Debug, Clone)]
pub struct Calculation {
    /// Selected locations in matrix order (start first).
    pub locations: Vec<Location>,
    pub matrix: DistanceMatrix,
    pub assignment: Assignment,
    pub plan: RenderPlan,
}

#[derive(Debug)]
pub struct TourPlanner<P> {
    builder: MatrixBuilder<P>,
    solve_options: SolveOptions,
    precision: u32,
}

impl<P: LegProvider> TourPlanner<P> {
    pub fn new(provider: P, config: &PlannerConfig) -> Self {
        Self {
            builder: MatrixBuilder::new(provider, config.matrix.clone()),
            solve_options: config.solve.clone(),
            precision: config.osrm.geometry_precision,
        }
    }

    /// Reuses legs across calculations made with this planner or any other
    /// planner sharing `cache`.
    pub fn with_cache(mut self, cache: Arc<LegCache>) -> Self {
        self.builder = self.builder.with_cache(cache);
        self
    }

    pub fn calculate(&self, locations: &[Location]) -> Result<Calculation, PlannerError> {
        if locations.is_empty() {
            return Err(PlannerError::NoLocations);
        }

        let (matrix, geometry) = self.builder.build(locations)?;
        let assignment = solve(matrix.rows(), &self.solve_options)?;
        let plan = assemble(&assignment, locations, &geometry, self.precision)?;
        info!(
            itinerary = %plan.itinerary,
            tour_length = assignment.tour_length(matrix.rows()),
            "tour calculated"
        );

        Ok(Calculation {
            locations: locations.to_vec(),
            matrix,
            assignment,
            plan,
        })
    }

    /// [`select`] followed by [`calculate`](Self::calculate).
    pub fn plan<L, S>(
        &self,
        catalog: &L,
        start: &str,
        destinations: &[S],
    ) -> Result<Calculation, PlannerError>
    where
        L: LocationLookup,
        S: AsRef<str>,
    {
        let locations = select(catalog, start, destinations)?;
        self.calculate(&locations)
    }
}

/// Resolves a start and destinations into matrix order.
///
/// Destinations repeating the start or each other are dropped.
pub fn select<L, S>(
    catalog: &L,
    start: &str,
    destinations: &[S],
) -> Result<Vec<Location>, PlannerError>
where
    L: LocationLookup,
    S: AsRef<str>,
{
    let resolve = |name: &str| {
        catalog
            .location(name)
            .cloned()
            .ok_or_else(|| PlannerError::UnknownLocation(name.to_string()))
    };

    let mut selected = vec![resolve(start)?];
    for name in destinations {
        let name = name.as_ref();
        let location = resolve(name)?;
        if selected.iter().any(|s| s.name == location.name) {
            warn!(name, "skipping repeated location");
            continue;
        }
        selected.push(location);
    }

    Ok(selected)
}
