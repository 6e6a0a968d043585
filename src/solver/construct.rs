//! Construction of a first feasible tour.
//!
//! The search is a depth-first walk over connected edges that always tries
//! the nearest unvisited successor first, so its first branch is exactly
//! the nearest-neighbor tour. On complete graphs that branch succeeds
//! immediately; on sparse graphs the walk backtracks until the cycle can be
//! closed, the graph is proven to have no Hamiltonian cycle, or the node
//! budget runs out.

use crate::distance::DistanceMatrix;
use crate::error::InfeasibleReason;
use log::warn;

/// Rejects matrices in which some city cannot be entered or left.
pub(crate) fn check_degrees(matrix: &DistanceMatrix) -> Result<(), InfeasibleReason> {
    match (0..matrix.size()).find(|&c| matrix.out_degree(c) == 0 || matrix.in_degree(c) == 0) {
        Some(city) => Err(InfeasibleReason::IsolatedCity { city }),
        None => Ok(()),
    }
}

/// Finds a Hamiltonian cycle starting at `start`, trying nearest successors
/// first. `budget` bounds the number of cities pushed onto the path.
pub(crate) fn nearest_first_tour(
    matrix: &DistanceMatrix,
    start: usize,
    budget: usize,
) -> Result<Vec<usize>, InfeasibleReason> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    let mut path = Vec::with_capacity(n);
    // frontier[k] holds the untried successors of path[k], nearest last.
    let mut frontier: Vec<Vec<usize>> = Vec::with_capacity(n);

    visited[start] = true;
    path.push(start);
    frontier.push(successors(matrix, start, &visited));

    let mut expanded = 0usize;
    let mut backtracked = false;

    loop {
        let last = path[path.len() - 1];
        if path.len() == n && matrix.is_connected(last, start) {
            if backtracked {
                warn!("feasible tour needed backtracking: {expanded} search nodes expanded");
            }
            return Ok(path);
        }

        let next = frontier
            .last_mut()
            .and_then(|candidates| pop_unvisited(candidates, &visited));

        match next {
            Some(city) => {
                expanded += 1;
                if expanded > budget {
                    warn!("feasible tour search gave up after {budget} search nodes");
                    return Err(InfeasibleReason::BudgetExceeded { budget });
                }
                visited[city] = true;
                path.push(city);
                frontier.push(successors(matrix, city, &visited));
            }
            None => {
                backtracked = true;
                frontier.pop();
                if let Some(city) = path.pop() {
                    visited[city] = false;
                }
                if path.is_empty() {
                    return Err(InfeasibleReason::Exhausted);
                }
            }
        }
    }
}

/// Unvisited cities reachable from `from`, sorted so that the nearest one
/// (lowest index on ties) is popped first.
fn successors(matrix: &DistanceMatrix, from: usize, visited: &[bool]) -> Vec<usize> {
    let mut next: Vec<usize> = (0..matrix.size())
        .filter(|&to| !visited[to] && matrix.is_connected(from, to))
        .collect();
    next.sort_by(|&a, &b| {
        matrix
            .get(from, b)
            .total_cmp(&matrix.get(from, a))
            .then(b.cmp(&a))
    });
    next
}

fn pop_unvisited(candidates: &mut Vec<usize>, visited: &[bool]) -> Option<usize> {
    while let Some(city) = candidates.pop() {
        if !visited[city] {
            return Some(city);
        }
    }
    None
}
