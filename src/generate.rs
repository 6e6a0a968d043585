//! Seeded random instances.
//!
//! Both generators put `+inf` on the diagonal, matching the instances the
//! reference solutions were computed on.

use crate::distance::DistanceMatrix;
use crate::error::InputError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A complete symmetric graph: `A + Aᵀ` for `A` uniform in `[0, 1)`.
pub fn complete_random(n: usize, seed: u64) -> Result<DistanceMatrix, InputError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let a: Vec<f64> = (0..n * n).map(|_| rng.random_range(0.0..1.0)).collect();

    let mut data = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            data[i * n + j] = if i == j {
                f64::INFINITY
            } else {
                a[i * n + j] + a[j * n + i]
            };
        }
    }
    DistanceMatrix::from_data(n, data)
}

/// `n` points uniform in the unit square with Euclidean distances between
/// every pair.
///
/// # Examples
///
/// ```
/// use tsp_anneal::generate::geometric;
///
/// let dm = geometric(5, 1).expect("n >= 2");
/// assert_eq!(dm.size(), 5);
/// assert!(dm.is_symmetric(1e-12));
/// assert!(dm.get(2, 4) <= 2f64.sqrt());
/// ```
pub fn geometric(n: usize, seed: u64) -> Result<DistanceMatrix, InputError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect();

    let mut data = vec![f64::INFINITY; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = (points[i].0 - points[j].0).hypot(points[i].1 - points[j].1);
            data[i * n + j] = d;
            data[j * n + i] = d;
        }
    }
    DistanceMatrix::from_data(n, data)
}
