//! The tour problem as seen by the annealing engine.

use crate::distance::DistanceMatrix;
use crate::sa::SaProblem;
use crate::tour::order_cost;
use rand::seq::SliceRandom;
use rand::Rng;

/// Closed tours over a distance matrix, perturbed by 2-opt segment reversal.
///
/// A tour that uses a disconnected edge costs `+inf`, which the runner
/// treats as infeasible and never accepts.
pub(crate) struct TourProblem<'a> {
    matrix: &'a DistanceMatrix,
}

impl<'a> TourProblem<'a> {
    pub(crate) fn new(matrix: &'a DistanceMatrix) -> Self {
        Self { matrix }
    }
}

impl SaProblem for TourProblem<'_> {
    type Solution = Vec<usize>;

    /// A uniformly random order. May be infeasible on sparse matrices.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.matrix.size()).collect();
        order.shuffle(rng);
        order
    }

    fn cost(&self, order: &Vec<usize>) -> f64 {
        order_cost(order, self.matrix)
    }

    /// Reverses `order[i..=j]` for two distinct positions drawn uniformly.
    fn neighbor<R: Rng>(&self, order: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut next = order.clone();
        let n = next.len();
        if n < 2 {
            return next;
        }
        let a = rng.random_range(0..n);
        let mut b = rng.random_range(0..n - 1);
        if b >= a {
            b += 1;
        }
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        next[i..=j].reverse();
        next
    }
}
