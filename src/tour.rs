//! Tours: closed visiting orders over every city.

use crate::distance::DistanceMatrix;
use crate::error::TourError;

/// A visiting order over all cities, implicitly closed by returning from the
/// last city to the first.
///
/// A `Tour` is always a permutation of `0..n`; [`Tour::new`] refuses
/// anything else. Whether every edge exists depends on the matrix and is
/// checked by [`Tour::validate`].
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
/// use tsp_anneal::tour::Tour;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 4.0],
///     vec![2.0, 4.0, 0.0],
/// ])
/// .expect("valid matrix");
/// let tour = Tour::new(vec![0, 1, 2], 3).expect("permutation");
/// assert_eq!(tour.cost(&dm), 7.0);
/// assert_eq!(tour.closed(), vec![0, 1, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Creates a tour over `n` cities, checking the permutation property.
    pub fn new(order: Vec<usize>, n: usize) -> Result<Self, TourError> {
        check_permutation(&order, n)?;
        Ok(Self { order })
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Consumes the tour, returning the visiting order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Number of cities visited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false` for tours built through [`Tour::new`] on a valid
    /// matrix; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over the directed edges of the cycle, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.order.len();
        (0..n).map(move |k| (self.order[k], self.order[(k + 1) % n]))
    }

    /// Total cost of the cycle, or `+inf` if any edge is disconnected.
    pub fn cost(&self, matrix: &DistanceMatrix) -> f64 {
        order_cost(&self.order, matrix)
    }

    /// Checks the full validity invariant against `matrix`: a permutation of
    /// all of its cities whose every edge is connected.
    pub fn validate(&self, matrix: &DistanceMatrix) -> Result<(), TourError> {
        check_permutation(&self.order, matrix.size())?;
        match self.edges().find(|&(from, to)| !matrix.is_connected(from, to)) {
            Some((from, to)) => Err(TourError::Disconnected { from, to }),
            None => Ok(()),
        }
    }

    /// The visiting order with the starting city repeated at the end.
    pub fn closed(&self) -> Vec<usize> {
        let mut cycle = Vec::with_capacity(self.order.len() + 1);
        cycle.extend_from_slice(&self.order);
        if let Some(&first) = self.order.first() {
            cycle.push(first);
        }
        cycle
    }

    /// The same cycle, rotated to start at `city`.
    ///
    /// Returns `None` if `city` is not on the tour.
    pub fn rotated_to(&self, city: usize) -> Option<Tour> {
        let pos = self.order.iter().position(|&c| c == city)?;
        let mut order = self.order.clone();
        order.rotate_left(pos);
        Some(Tour { order })
    }
}

/// Cost of the closed cycle through `order`; `+inf` on a missing edge.
pub(crate) fn order_cost(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    let n = order.len();
    let mut total = 0.0;
    for k in 0..n {
        let (from, to) = (order[k], order[(k + 1) % n]);
        if !matrix.is_connected(from, to) {
            return f64::INFINITY;
        }
        total += matrix.get(from, to);
    }
    total
}

fn check_permutation(order: &[usize], n: usize) -> Result<(), TourError> {
    if order.len() != n {
        return Err(TourError::WrongLength {
            expected: n,
            actual: order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &city in order {
        if city >= n {
            return Err(TourError::CityOutOfRange { city, size: n });
        }
        if std::mem::replace(&mut seen[city], true) {
            return Err(TourError::DuplicateCity { city });
        }
    }
    Ok(())
}
