//! Minimum-cost Hamiltonian cycles by simulated annealing.
//!
//! Given a dense n×n distance matrix, possibly asymmetric and possibly with
//! missing edges (NaN or `+inf`), finds a closed tour that visits every city
//! exactly once and keeps its total cost low:
//!
//! - **Distance matrices** ([`distance`]): validated, immutable input.
//! - **Tours** ([`tour`]): permutations of all cities with the cycle
//!   validity check.
//! - **Simulated Annealing** ([`sa`]): a problem-agnostic engine with
//!   pluggable cooling schedules.
//! - **Solver** ([`solver`]): feasible construction, annealing with 2-opt
//!   moves, 2-opt polishing and seeded restarts.
//! - **Scoring** ([`scoring`]) and **instance generation** ([`generate`])
//!   for benchmarking solutions against reference tours.
//!
//! # Example
//!
//! ```
//! use tsp_anneal::{CycleSolver, HamiltonianCycleSolver};
//!
//! let solver = HamiltonianCycleSolver::from_rows(vec![
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     vec![1.0, 0.0, 4.0, 5.0],
//!     vec![2.0, 4.0, 0.0, 6.0],
//!     vec![3.0, 5.0, 6.0, 0.0],
//! ])?;
//! let cycle = solver.get_solution()?;
//! assert_eq!(cycle.len(), 5);
//! # Ok::<(), tsp_anneal::SolveError>(())
//! ```
//!
//! # Features
//!
//! - `parallel`: run restarts on the rayon thread pool.
//! - `serde`: serialization of matrices, tours, configurations and reports.

pub mod distance;
pub mod error;
pub mod generate;
pub mod sa;
pub mod scoring;
pub mod solver;
pub mod tour;

pub use distance::DistanceMatrix;
pub use error::{InfeasibleReason, InputError, SolveError, TourError};
pub use solver::{CycleSolver, HamiltonianCycleSolver, SolveReport, SolverConfig};
pub use tour::Tour;
