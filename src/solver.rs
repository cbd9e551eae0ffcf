//! Visiting order from a distance matrix via the assignment relaxation.
//!
//! Each location (row) is matched to a successor location (column) so that
//! the sum of matched distances is minimal. The matched columns, read in row
//! order, are used as the visiting order. This is a heuristic: a minimum-cost
//! matching may split into several disjoint cycles instead of one closed
//! tour. [`Assignment::cycles`] exposes that decomposition and the solver
//! logs a warning when it happens, but the matching is returned unchanged.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::OptimizationError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Let a location be matched to itself.
    ///
    /// Distance matrices have a zero diagonal, so with this set the identity
    /// matching is always optimal and the order equals the input order at
    /// zero cost. When unset the diagonal is priced above any full matching.
    pub allow_self_assignment: bool,
}

/// Minimum-cost matching of locations to successors.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// `order[k]` is the location visited at position `k`.
    pub order: Vec<usize>,
    /// Sum of `matrix[k][order[k]]`. Not the length of the closed tour.
    pub cost: f64,
}

impl Assignment {
    /// Disjoint cycles of the permutation `k -> order[k]`, each starting at
    /// its smallest index.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.order.len()];
        let mut cycles = Vec::new();

        for start in 0..self.order.len() {
            if seen[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut current = start;
            while !seen[current] {
                seen[current] = true;
                cycle.push(current);
                current = self.order[current];
            }
            cycles.push(cycle);
        }

        cycles
    }

    pub fn is_single_tour(&self) -> bool {
        self.cycles().len() <= 1
    }

    /// Length of the closed loop `order[0] -> order[1] -> ... -> order[0]`.
    pub fn tour_length(&self, matrix: &[Vec<f64>]) -> f64 {
        let n = self.order.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|k| matrix[self.order[k]][self.order[(k + 1) % n]])
            .sum()
    }
}

/// Solves the assignment problem over `matrix`.
pub fn solve(matrix: &[Vec<f64>], options: &SolveOptions) -> Result<Assignment, OptimizationError> {
    validate(matrix)?;
    let n = matrix.len();

    if n == 1 {
        return Ok(Assignment {
            order: vec![0],
            cost: 0.0,
        });
    }

    let mut costs = matrix.to_vec();
    if !options.allow_self_assignment {
        let penalty = matrix.iter().flatten().sum::<f64>() + 1.0;
        for (i, row) in costs.iter_mut().enumerate() {
            row[i] = penalty;
        }
    }

    let order = hungarian(&costs);
    let cost = order.iter().enumerate().map(|(row, &col)| matrix[row][col]).sum();
    let assignment = Assignment { order, cost };

    let cycles = assignment.cycles();
    debug!(order = ?assignment.order, cost, cycles = cycles.len(), "assignment solved");
    if cycles.len() > 1 {
        warn!(
            cycles = ?cycles,
            "assignment splits into {} disjoint cycles; order is not a single tour",
            cycles.len()
        );
    }

    Ok(assignment)
}

fn validate(matrix: &[Vec<f64>]) -> Result<(), OptimizationError> {
    let n = matrix.len();
    if n == 0 {
        return Err(OptimizationError::Empty);
    }

    for (row, values) in matrix.iter().enumerate() {
        if values.len() != n {
            return Err(OptimizationError::NotSquare {
                row,
                len: values.len(),
                expected: n,
            });
        }
        if let Some((col, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(OptimizationError::InvalidEntry { row, col, value });
        }
    }

    Ok(())
}

/// Shortest augmenting path Hungarian method with row/column potentials,
/// O(n³). Returns the column matched to every row.
fn hungarian(costs: &[Vec<f64>]) -> Vec<usize> {
    let n = costs.len();
    // 1-based; column 0 is a virtual root and `row_of[j] == 0` means unmatched.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col0] = true;
            let row0 = row_of[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0;

            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let slack = costs[row0 - 1][col - 1] - u[row0] - v[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            for col in 0..=n {
                if used[col] {
                    u[row_of[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if row_of[col0] == 0 {
                break;
            }
        }

        loop {
            let col1 = way[col0];
            row_of[col0] = row_of[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut order = vec![0; n];
    for col in 1..=n {
        order[row_of[col] - 1] = col - 1;
    }
    order
}
