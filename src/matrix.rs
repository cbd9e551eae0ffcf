//! Pairwise distance matrix and leg geometry table.
//!
//! Legs are assumed symmetric: each unordered pair is routed once and the
//! result is stored for both directions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::PlannerError;
use crate::location::Location;
use crate::traits::{Leg, LegProvider};

/// Symmetric n×n distance table with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

/// Encoded leg geometries indexed like the [`DistanceMatrix`]. The diagonal is
/// always empty.
///
/// Both cells of a pair hold the same geometry; [`origin`](Self::origin)
/// tells which end it was routed from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTable {
    cells: Vec<Option<(usize, String)>>,
    size: usize,
}

impl GeometryTable {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> Option<&str> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells[from * self.size + to]
            .as_ref()
            .map(|(_, geometry)| geometry.as_str())
    }

    /// Index of the location the pair's geometry starts at.
    pub fn origin(&self, from: usize, to: usize) -> Option<usize> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells[from * self.size + to].as_ref().map(|&(origin, _)| origin)
    }
}

/// A memoized leg and the point it was routed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLeg {
    pub origin: (f64, f64),
    pub leg: Leg,
}

/// Legs memoized by unordered coordinate pair, shared across calculations.
#[derive(Debug, Default)]
pub struct LegCache {
    legs: Mutex<HashMap<(String, String), CachedLeg>>,
}

impl LegCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: (f64, f64), b: (f64, f64)) -> Option<CachedLeg> {
        self.legs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pair_key(a, b))
            .cloned()
    }

    /// Stores a leg routed from `from` to `to`.
    pub fn insert(&self, from: (f64, f64), to: (f64, f64), leg: Leg) {
        self.legs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pair_key(from, to), CachedLeg { origin: from, leg });
    }

    pub fn len(&self) -> usize {
        self.legs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.legs.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

fn location_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

fn pair_key(a: (f64, f64), b: (f64, f64)) -> (String, String) {
    let (a, b) = (location_key(a), location_key(b));
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatrixOptions {
    /// Upper bound on concurrent leg requests. 0 lets rayon pick.
    pub max_concurrency: usize,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

/// Routes every unordered pair of locations through a [`LegProvider`].
#[derive(Debug)]
pub struct MatrixBuilder<P> {
    provider: P,
    options: MatrixOptions,
    cache: Option<Arc<LegCache>>,
}

impl<P: LegProvider> MatrixBuilder<P> {
    pub fn new(provider: P, options: MatrixOptions) -> Self {
        Self {
            provider,
            options,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<LegCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds both tables, or fails on the first pair that cannot be routed.
    ///
    /// Requests run concurrently; once one fails, pairs that have not started
    /// yet are skipped and nothing is returned for the others.
    pub fn build(
        &self,
        locations: &[Location],
    ) -> Result<(DistanceMatrix, GeometryTable), PlannerError> {
        let n = locations.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        info!(locations = n, pairs = pairs.len(), "building distance matrix");

        let aborted = AtomicBool::new(false);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.max_concurrency)
            .build()?;

        let legs = pool.install(|| {
            pairs
                .par_iter()
                .map(|&(i, j)| self.pair_leg(locations, i, j, &aborted))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut rows = vec![vec![0.0; n]; n];
        let mut cells = vec![None; n * n];
        for (i, j, origin, leg) in legs.into_iter().flatten() {
            rows[i][j] = leg.distance;
            rows[j][i] = leg.distance;
            cells[j * n + i] = Some((origin, leg.geometry.clone()));
            cells[i * n + j] = Some((origin, leg.geometry));
        }

        Ok((DistanceMatrix { rows }, GeometryTable { cells, size: n }))
    }

    fn pair_leg(
        &self,
        locations: &[Location],
        i: usize,
        j: usize,
        aborted: &AtomicBool,
    ) -> Result<Option<(usize, usize, usize, Leg)>, PlannerError> {
        if aborted.load(Ordering::Relaxed) {
            return Ok(None);
        }

        let (from, to) = (&locations[i], &locations[j]);
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(from.coords(), to.coords())) {
            debug!(from = %from.name, to = %to.name, "leg cache hit");
            let origin = if location_key(cached.origin) == location_key(from.coords()) {
                i
            } else {
                j
            };
            return Ok(Some((i, j, origin, cached.leg)));
        }

        match self.provider.fetch_leg(from.coords(), to.coords()) {
            Ok(leg) => {
                debug!(from = %from.name, to = %to.name, distance = leg.distance, "leg routed");
                if let Some(cache) = &self.cache {
                    cache.insert(from.coords(), to.coords(), leg.clone());
                }
                Ok(Some((i, j, i, leg)))
            }
            Err(source) => {
                aborted.store(true, Ordering::Relaxed);
                warn!(from = %from.name, to = %to.name, error = %source, "leg routing failed");
                Err(PlannerError::Routing {
                    from: from.name.clone(),
                    to: to.name.clone(),
                    source,
                })
            }
        }
    }
}
