//! Hamiltonian cycle search.
//!
//! [`HamiltonianCycleSolver`] drives the [`sa`](crate::sa) engine over
//! closed tours:
//!
//! 1. Reject matrices where some city cannot be entered or left.
//! 2. Build a feasible starting tour (nearest-neighbor walk with
//!    backtracking over connected edges).
//! 3. Anneal with 2-opt segment reversals; tours using a disconnected edge
//!    cost `+inf` and are never accepted.
//! 4. Optionally polish the best tour with deterministic 2-opt descent.
//! 5. Repeat for each restart, keep the cheapest, and re-validate it
//!    against the matrix before returning.

mod config;
mod construct;
mod hamiltonian;
mod problem;
mod two_opt;

pub use config::{InitialTour, SolverConfig, DEFAULT_SEED};
pub use hamiltonian::{CycleSolver, HamiltonianCycleSolver, SolveReport};
