//! Dense distance matrix.

use crate::error::InputError;

/// A dense n×n distance matrix stored in row-major order.
///
/// Entry `(i, j)` is the cost of travelling directly from city `i` to city
/// `j`. The matrix need not be symmetric. A NaN or `+inf` entry means the
/// edge `i -> j` does not exist. Diagonal entries are never read and are not
/// validated, so generators are free to store `0.0` or `+inf` there.
///
/// Once built, a matrix cannot be modified.
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, f64::NAN],
///     vec![1.0, 0.0, 2.0],
///     vec![f64::INFINITY, 2.0, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(dm.size(), 3);
/// assert!(dm.is_connected(0, 1));
/// assert!(!dm.is_connected(0, 2));
/// assert!(!dm.is_connected(2, 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// Rejects fewer than two rows, ragged or non-square rows, and negative
    /// off-diagonal distances.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InputError> {
        let size = rows.len();
        if size < 2 {
            return Err(InputError::TooSmall { size });
        }
        // Shape first: a ragged input must not size the allocation.
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(InputError::NotSquare {
                row,
                len: values.len(),
                expected: size,
            });
        }
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        Self::checked(size, data)
    }

    /// Builds a matrix from a flat row-major buffer of `size * size` entries.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, InputError> {
        if size < 2 {
            return Err(InputError::TooSmall { size });
        }
        if size.checked_mul(size) != Some(data.len()) {
            return Err(InputError::DataLength {
                expected: size.saturating_mul(size),
                actual: data.len(),
            });
        }
        Self::checked(size, data)
    }

    fn checked(size: usize, data: Vec<f64>) -> Result<Self, InputError> {
        for from in 0..size {
            for to in 0..size {
                let value = data[from * size + to];
                // NaN compares false, so the sentinel passes.
                if from != to && value < 0.0 {
                    return Err(InputError::NegativeDistance { from, to, value });
                }
            }
        }
        Ok(Self { data, size })
    }

    /// Returns the raw entry for the edge `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Returns the distance of `from -> to`, or `+inf` when the edge is
    /// disconnected or `from == to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        if self.is_connected(from, to) {
            self.get(from, to)
        } else {
            f64::INFINITY
        }
    }

    /// Returns `true` if the edge `from -> to` exists.
    pub fn is_connected(&self, from: usize, to: usize) -> bool {
        from != to && self.get(from, to).is_finite()
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of connected edges leaving `city`.
    pub fn out_degree(&self, city: usize) -> usize {
        (0..self.size).filter(|&to| self.is_connected(city, to)).count()
    }

    /// Number of connected edges entering `city`.
    pub fn in_degree(&self, city: usize) -> usize {
        (0..self.size)
            .filter(|&from| self.is_connected(from, city))
            .count()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two disconnected entries compare equal; a disconnected entry never
    /// equals a finite one.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                match (self.is_connected(i, j), self.is_connected(j, i)) {
                    (true, true) => {
                        if (self.get(i, j) - self.get(j, i)).abs() > tol {
                            return false;
                        }
                    }
                    (false, false) => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// Returns the nearest candidate reachable from `from` over a connected
    /// edge. Ties go to the candidate listed first.
    ///
    /// Returns `None` if no candidate is reachable.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .filter(|&c| self.is_connected(from, c))
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }

    /// Mean of all connected off-diagonal distances, or `None` when every
    /// edge is disconnected.
    pub fn mean_distance(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for from in 0..self.size {
            for to in 0..self.size {
                if self.is_connected(from, to) {
                    sum += self.get(from, to);
                    count += 1;
                }
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Copies the matrix back into nested rows.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size).map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = InputError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 8.0],
            vec![5.0, 0.0, f64::NAN],
            vec![8.0, f64::INFINITY, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_from_rows() {
        let dm = sample();
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(2, 0), 8.0);
    }

    #[test]
    fn test_too_small() {
        assert_eq!(
            DistanceMatrix::from_rows(vec![vec![0.0]]),
            Err(InputError::TooSmall { size: 1 })
        );
        assert_eq!(
            DistanceMatrix::from_rows(Vec::new()),
            Err(InputError::TooSmall { size: 0 })
        );
    }

    #[test]
    fn test_not_square() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            InputError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_many_empty_rows_rejected_without_allocating() {
        let err = DistanceMatrix::from_rows(vec![Vec::new(); 1 << 21]).unwrap_err();
        assert_eq!(
            err,
            InputError::NotSquare {
                row: 0,
                len: 0,
                expected: 1 << 21
            }
        );

        // Only the last row is short.
        let mut rows = vec![vec![0.0; 3]; 3];
        rows[2].pop();
        assert!(matches!(
            DistanceMatrix::from_rows(rows),
            Err(InputError::NotSquare { row: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_from_data_size_overflow() {
        assert_eq!(
            DistanceMatrix::from_data(usize::MAX, vec![0.0; 4]),
            Err(InputError::DataLength {
                expected: usize::MAX,
                actual: 4
            })
        );
    }

    #[test]
    fn test_negative_rejected() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, InputError::NegativeDistance { from: 0, to: 1, .. }));

        let err = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![f64::NEG_INFINITY, 0.0]])
            .unwrap_err();
        assert!(matches!(err, InputError::NegativeDistance { from: 1, to: 0, .. }));
    }

    #[test]
    fn test_diagonal_is_ignored() {
        let dm = DistanceMatrix::from_rows(vec![vec![-3.0, 1.0], vec![1.0, f64::INFINITY]]);
        assert!(dm.is_ok());
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(
            DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]),
            Err(InputError::DataLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_connectivity() {
        let dm = sample();
        assert!(dm.is_connected(0, 1));
        assert!(!dm.is_connected(1, 2));
        assert!(!dm.is_connected(2, 1));
        assert!(!dm.is_connected(0, 0));
        assert_eq!(dm.distance(1, 2), f64::INFINITY);
        assert_eq!(dm.out_degree(0), 2);
        assert_eq!(dm.in_degree(1), 1);
    }

    #[test]
    fn test_symmetric() {
        assert!(sample().is_symmetric(1e-10));
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 10.0], vec![15.0, 0.0]]).expect("valid");
        assert!(!dm.is_symmetric(1e-10));
        let dm =
            DistanceMatrix::from_rows(vec![vec![0.0, 10.0], vec![f64::NAN, 0.0]]).expect("valid");
        assert!(!dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_nearest_neighbor_skips_disconnected() {
        let dm = sample();
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(1, &[2]), None);
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
    }

    #[test]
    fn test_mean_distance() {
        let dm = sample();
        // 5 + 8 + 5 + 8 over four connected edges
        assert!((dm.mean_distance().expect("connected") - 6.5).abs() < 1e-12);

        let dm = DistanceMatrix::from_rows(vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]])
            .expect("valid");
        assert_eq!(dm.mean_distance(), None);
    }

    #[test]
    fn test_rows_round_trip() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).expect("valid");
        assert_eq!(dm.rows(), vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
    }
}
