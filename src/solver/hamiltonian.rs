//! The Hamiltonian cycle solver.

use super::config::{InitialTour, SolverConfig};
use super::construct::{check_degrees, nearest_first_tour};
use super::problem::TourProblem;
use super::two_opt;
use crate::distance::DistanceMatrix;
use crate::error::{Result, SolveError};
use crate::sa::{SaProblem, SaRunner};
use crate::tour::{order_cost, Tour};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The single capability of a tour solver.
///
/// Implementors keep all search state private. `get_solution` is the
/// interface consumed by external scoring: the closed cycle, with the
/// starting city repeated at the end.
pub trait CycleSolver {
    /// Finds a valid tour or explains why none was produced.
    fn solve(&self) -> Result<Tour>;

    /// The solved tour as a closed cycle of `n + 1` cities.
    fn get_solution(&self) -> Result<Vec<usize>> {
        self.solve().map(|tour| tour.closed())
    }
}

/// Outcome of [`HamiltonianCycleSolver::solve_with_report`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveReport {
    /// The best tour over all restarts.
    pub tour: Tour,

    /// Its cost, recomputed from the matrix.
    pub cost: f64,

    /// Index of the restart that produced `tour`.
    pub best_restart: usize,

    /// Number of restarts run.
    pub restarts: usize,

    /// Annealing iterations summed over restarts.
    pub iterations: usize,

    /// Accepted moves summed over restarts.
    pub accepted_moves: usize,

    /// Strictly improving moves summed over restarts.
    pub improving_moves: usize,

    /// Best-cost history of the winning restart: the annealing samples,
    /// then the polished cost if polishing improved on them. Never
    /// increases.
    pub cost_history: Vec<f64>,

    /// Whether a cancellation flag stopped any restart early.
    pub cancelled: bool,
}

/// Result of a single restart.
struct RunOutcome {
    order: Vec<usize>,
    cost: f64,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
    cost_history: Vec<f64>,
    cancelled: bool,
}

/// Searches for a minimum-cost Hamiltonian cycle with simulated annealing.
///
/// The solver owns its matrix and never changes it. Each call to
/// [`CycleSolver::solve`] is independent and a pure function of the matrix
/// and the configuration (including its seed).
///
/// # Examples
///
/// ```
/// use tsp_anneal::distance::DistanceMatrix;
/// use tsp_anneal::solver::{CycleSolver, HamiltonianCycleSolver};
///
/// let solver = HamiltonianCycleSolver::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 4.0, 5.0],
///     vec![2.0, 4.0, 0.0, 6.0],
///     vec![3.0, 5.0, 6.0, 0.0],
/// ])
/// .expect("valid matrix");
///
/// let tour = solver.solve().expect("feasible");
/// assert_eq!(tour.cost(solver.matrix()), 14.0);
///
/// let cycle = solver.get_solution().expect("feasible");
/// assert_eq!(cycle.len(), 5);
/// assert_eq!(cycle.first(), cycle.last());
/// ```
#[derive(Debug, Clone)]
pub struct HamiltonianCycleSolver {
    matrix: DistanceMatrix,
    config: SolverConfig,
}

impl HamiltonianCycleSolver {
    /// Creates a solver with a configuration scaled to `matrix`
    /// (see [`SolverConfig::for_matrix`]).
    pub fn new(matrix: DistanceMatrix) -> Self {
        let config = SolverConfig::for_matrix(&matrix);
        Self { matrix, config }
    }

    /// Validates raw rows and creates a solver for them.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Ok(Self::new(DistanceMatrix::from_rows(rows)?))
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: SolverConfig) -> Result<Self> {
        config.validate().map_err(SolveError::InvalidConfig)?;
        self.config = config;
        Ok(self)
    }

    /// The distance matrix being solved.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves and reports search statistics alongside the tour.
    pub fn solve_with_report(&self) -> Result<SolveReport> {
        self.solve_with_cancel(None)
    }

    /// Solves with an optional cancellation flag.
    ///
    /// Raising the flag makes every running restart stop at its next
    /// temperature step and return its best tour so far; the report is
    /// still a valid tour.
    pub fn solve_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> Result<SolveReport> {
        check_degrees(&self.matrix).map_err(SolveError::Infeasible)?;

        let base_seed = self.config.anneal.seed.unwrap_or_else(rand::random);
        let outcomes = self.run_restarts(base_seed, &cancel)?;

        let mut best_restart = 0;
        for (r, outcome) in outcomes.iter().enumerate() {
            if outcome.cost < outcomes[best_restart].cost {
                best_restart = r;
            }
        }

        let winner = &outcomes[best_restart];
        let tour = Tour::new(winner.order.clone(), self.matrix.size())?;
        tour.validate(&self.matrix)?;
        let cost = tour.cost(&self.matrix);

        info!(
            "solved {} cities over {} restart(s): best cost {cost:.6} from restart {best_restart}",
            self.matrix.size(),
            outcomes.len()
        );

        Ok(SolveReport {
            cost,
            best_restart,
            restarts: outcomes.len(),
            iterations: outcomes.iter().map(|o| o.iterations).sum(),
            accepted_moves: outcomes.iter().map(|o| o.accepted_moves).sum(),
            improving_moves: outcomes.iter().map(|o| o.improving_moves).sum(),
            cost_history: winner.cost_history.clone(),
            cancelled: outcomes.iter().any(|o| o.cancelled),
            tour,
        })
    }

    #[cfg(feature = "parallel")]
    fn run_restarts(
        &self,
        base_seed: u64,
        cancel: &Option<Arc<AtomicBool>>,
    ) -> Result<Vec<RunOutcome>> {
        if self.config.parallel && self.config.restarts > 1 {
            (0..self.config.restarts)
                .into_par_iter()
                .map(|r| self.run_once(r, base_seed.wrapping_add(r as u64), cancel.clone()))
                .collect()
        } else {
            self.run_sequential(base_seed, cancel)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_restarts(
        &self,
        base_seed: u64,
        cancel: &Option<Arc<AtomicBool>>,
    ) -> Result<Vec<RunOutcome>> {
        self.run_sequential(base_seed, cancel)
    }

    fn run_sequential(
        &self,
        base_seed: u64,
        cancel: &Option<Arc<AtomicBool>>,
    ) -> Result<Vec<RunOutcome>> {
        (0..self.config.restarts)
            .map(|r| self.run_once(r, base_seed.wrapping_add(r as u64), cancel.clone()))
            .collect()
    }

    /// Construction, annealing and polishing for one restart.
    fn run_once(
        &self,
        restart: usize,
        seed: u64,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunOutcome> {
        let n = self.matrix.size();
        let problem = TourProblem::new(&self.matrix);

        let initial = match self.config.initial_tour {
            InitialTour::NearestNeighbor => {
                nearest_first_tour(&self.matrix, restart % n, self.config.search_budget)
            }
            InitialTour::Random => {
                let mut rng = StdRng::seed_from_u64(seed);
                let order = problem.initial_solution(&mut rng);
                if order_cost(&order, &self.matrix).is_finite() {
                    Ok(order)
                } else {
                    nearest_first_tour(&self.matrix, order[0], self.config.search_budget)
                }
            }
        }
        .map_err(SolveError::Infeasible)?;
        let initial_cost = order_cost(&initial, &self.matrix);

        let mut anneal = self.config.anneal.clone();
        anneal.seed = Some(seed);
        let result = SaRunner::run_from(&problem, initial, &anneal, cancel)
            .map_err(SolveError::InvalidConfig)?;

        let mut order = result.best;
        let mut cost = result.best_cost;
        let mut cost_history = result.cost_history;
        if self.config.polish {
            // Keep the polished tour only on a strict recomputed improvement.
            let mut polished = order.clone();
            let polished_cost =
                two_opt::polish(&mut polished, &self.matrix, self.config.max_polish_passes);
            if polished_cost < cost {
                order = polished;
                cost = polished_cost;
                cost_history.push(cost);
            }
        }

        debug!(
            "restart {restart} (seed {seed}): initial {initial_cost:.6}, annealed {:.6}, \
             final {cost:.6} after {} iterations ({} accepted){}{}",
            result.best_cost,
            result.iterations,
            result.accepted_moves,
            if result.stagnated { ", stagnated" } else { "" },
            if result.timed_out { ", timed out" } else { "" },
        );

        Ok(RunOutcome {
            order,
            cost,
            iterations: result.iterations,
            accepted_moves: result.accepted_moves,
            improving_moves: result.improving_moves,
            cost_history,
            cancelled: result.cancelled,
        })
    }
}

impl CycleSolver for HamiltonianCycleSolver {
    fn solve(&self) -> Result<Tour> {
        self.solve_with_report().map(|report| report.tour)
    }
}
