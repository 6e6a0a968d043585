//! Scoring of closed paths against a reference solution.
//!
//! Paths here are in the closed form returned by
//! [`CycleSolver::get_solution`](crate::solver::CycleSolver::get_solution):
//! `n + 1` cities, the first repeated at the end.
//!
//! A valid path scores `100 * target_cost / path_cost`; anything that is not
//! a Hamiltonian cycle scores 0. A NaN ratio (0 / 0, or two infinite costs)
//! counts as 1, an infinite ratio as 0.

use crate::distance::DistanceMatrix;

/// Sum of the edge weights along an open or closed path. A NaN weight makes
/// the whole path cost `+inf`.
///
/// # Panics
///
/// Panics if a city is out of range for `matrix`.
pub fn path_cost(matrix: &DistanceMatrix, path: &[usize]) -> f64 {
    let mut cost = 0.0;
    for edge in path.windows(2) {
        let weight = matrix.get(edge[0], edge[1]);
        if weight.is_nan() {
            return f64::INFINITY;
        }
        cost += weight;
    }
    cost
}

/// Returns `true` if `path` is a closed Hamiltonian cycle over every city of
/// `matrix` using only finite edges.
pub fn is_hamiltonian_cycle(matrix: &DistanceMatrix, path: &[usize]) -> bool {
    let n = matrix.size();
    if path.len() != n + 1 || path[0] != path[n] {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in &path[..n] {
        if city >= n || std::mem::replace(&mut seen[city], true) {
            return false;
        }
    }
    path.windows(2)
        .all(|edge| matrix.get(edge[0], edge[1]).is_finite())
}

/// Percentage score of `solution` relative to `target`.
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
/// use tsp_anneal::scoring::score;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 4.0],
///     vec![2.0, 4.0, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(score(&dm, &[0, 1, 2, 0], &[0, 2, 1, 0]), 100.0);
/// assert_eq!(score(&dm, &[0, 1, 2], &[0, 2, 1, 0]), 0.0);
/// ```
pub fn score(matrix: &DistanceMatrix, solution: &[usize], target: &[usize]) -> f64 {
    if !is_hamiltonian_cycle(matrix, solution) {
        return 0.0;
    }
    let ratio = path_cost(matrix, target) / path_cost(matrix, solution);
    let ratio = if ratio.is_nan() {
        1.0
    } else if ratio.is_infinite() {
        0.0
    } else {
        ratio
    };
    ratio * 100.0
}

/// Mean of a batch of scores, or `None` for an empty batch.
pub fn mean_score<I: IntoIterator<Item = f64>>(scores: I) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    (count > 0).then(|| sum / count as f64)
}
