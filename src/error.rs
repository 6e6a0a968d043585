//! Error types.
//!
//! Every fallible operation in the crate returns one of these enums.
//! [`SolveError`] is the boundary error of the solver and wraps the others.

use thiserror::Error;

/// Rejection reasons for a distance matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Fewer than two cities.
    #[error("distance matrix needs at least 2 cities, got {size}")]
    TooSmall {
        /// Number of rows supplied.
        size: usize,
    },

    /// A row whose length differs from the number of rows.
    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Its length.
        len: usize,
        /// The number of rows.
        expected: usize,
    },

    /// A negative off-diagonal entry (including negative infinity).
    #[error("negative distance {value} from {from} to {to}")]
    NegativeDistance {
        /// Source city.
        from: usize,
        /// Destination city.
        to: usize,
        /// The rejected value.
        value: f64,
    },

    /// A flat row-major buffer whose length is not `size * size`.
    #[error("expected {expected} matrix entries, got {actual}")]
    DataLength {
        /// `size * size`.
        expected: usize,
        /// Length of the buffer.
        actual: usize,
    },
}

/// Violations of the tour invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TourError {
    #[error("tour visits {actual} cities, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("city {city} is out of range for {size} cities")]
    CityOutOfRange { city: usize, size: usize },

    #[error("city {city} is visited more than once")]
    DuplicateCity { city: usize },

    #[error("edge {from} -> {to} is disconnected")]
    Disconnected { from: usize, to: usize },
}

/// Why no Hamiltonian cycle could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InfeasibleReason {
    /// A city has no connected outgoing or incoming edge, so no cycle can
    /// pass through it.
    #[error("city {city} has no connected edge in one direction")]
    IsolatedCity {
        /// The city.
        city: usize,
    },

    /// Exhaustive search proved that no Hamiltonian cycle exists.
    #[error("no Hamiltonian cycle exists")]
    Exhausted,

    /// The construction search expanded `budget` nodes without finding a
    /// cycle. A cycle may still exist.
    #[error("no Hamiltonian cycle found within {budget} search nodes")]
    BudgetExceeded {
        /// The configured search budget.
        budget: usize,
    },
}

/// Errors surfaced by [`HamiltonianCycleSolver`](crate::solver::HamiltonianCycleSolver).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The distance matrix was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// The solver or annealing configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No Hamiltonian cycle over connected edges could be produced.
    #[error("infeasible: {0}")]
    Infeasible(InfeasibleReason),

    /// The solver produced a tour that failed its own output check.
    #[error("solver produced an invalid tour: {0}")]
    InvalidTour(#[from] TourError),
}

/// Convenience alias for solver results.
pub type Result<T> = std::result::Result<T, SolveError>;
