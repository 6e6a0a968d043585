//! SA execution loop.

use super::config::{CoolingSchedule, SaConfig};
use super::types::SaProblem;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Iteration at which `best` was found (0 = the initial solution).
    pub best_iteration: usize,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Number of neighbors rejected as infeasible.
    pub infeasible_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped because `max_no_improve` was reached.
    pub stagnated: bool,

    /// Whether the run stopped because `time_limit_ms` elapsed.
    pub timed_out: bool,

    /// Best cost sampled at regular intervals for history tracking.
    /// Never increases.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization from `problem.initial_solution`.
    pub fn run<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution>, String> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>, String> {
        config.validate()?;
        let mut rng = create_rng(config.seed);
        let initial = problem.initial_solution(&mut rng);
        Ok(anneal(problem, initial, config, cancel, rng))
    }

    /// Runs SA starting from a caller-supplied solution.
    ///
    /// The random stream is seeded exactly as in [`SaRunner::run`], so a
    /// fixed seed and the same initial solution give the same result.
    pub fn run_from<P: SaProblem>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>, String> {
        config.validate()?;
        let rng = create_rng(config.seed);
        Ok(anneal(problem, initial, config, cancel, rng))
    }
}

fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

fn anneal<P: SaProblem>(
    problem: &P,
    initial: P::Solution,
    config: &SaConfig,
    cancel: Option<Arc<AtomicBool>>,
    mut rng: StdRng,
) -> SaResult<P::Solution> {
    let started = Instant::now();
    let deadline = config.time_limit_ms.map(Duration::from_millis);

    let mut current = initial;
    let mut current_cost = problem.cost(&current);
    let mut best = current.clone();
    let mut best_cost = current_cost;
    let mut best_iteration = 0usize;

    let mut temperature = config.initial_temperature;
    let mut total_iterations = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut infeasible_moves = 0usize;
    let mut no_improve = 0usize;
    let mut cancelled = false;
    let mut stagnated = false;
    let mut timed_out = false;

    // For linear cooling: compute step count
    let linear_max_steps = compute_linear_steps(config);

    // Cost history: sample every N iterations
    let history_interval = 100.max(config.iterations_per_temperature);
    let mut cost_history = vec![best_cost];

    let mut step = 0usize; // temperature step counter

    'outer: while temperature > config.min_temperature {
        if let Some(ref flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
        }
        if deadline.is_some_and(|limit| started.elapsed() >= limit) {
            timed_out = true;
            break;
        }

        let inner_iters = match config.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            _ => config.iterations_per_temperature,
        };

        for _ in 0..inner_iters {
            if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                break 'outer;
            }

            let neighbor = problem.neighbor(&current, &mut rng);
            let neighbor_cost = problem.cost(&neighbor);
            total_iterations += 1;
            no_improve += 1;

            if !problem.is_feasible(neighbor_cost) {
                infeasible_moves += 1;
            } else {
                let delta = neighbor_cost - current_cost;

                // Metropolis acceptance criterion
                let accept = if delta <= 0.0 {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    true
                } else {
                    let probability = (-delta / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                };

                if accept {
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted_moves += 1;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        best_iteration = total_iterations;
                        no_improve = 0;
                    }
                }
            }

            if total_iterations.is_multiple_of(history_interval) {
                cost_history.push(best_cost);
            }

            if config.max_no_improve > 0 && no_improve >= config.max_no_improve {
                stagnated = true;
                break 'outer;
            }
        }

        trace!(
            "sa step {step}: temperature {temperature:.6}, current {current_cost:.6}, best {best_cost:.6}"
        );

        // Cool down; stop once rounding keeps T from dropping.
        let next = cool(temperature, config, step, linear_max_steps);
        if !(next < temperature) {
            debug!("sa temperature stuck at {temperature:e} after step {step}, stopping");
            break;
        }
        temperature = next;
        step += 1;
    }

    // Final history entry
    if cost_history.last().is_none_or(|&last| last != best_cost) {
        cost_history.push(best_cost);
    }

    debug!(
        "sa finished after {total_iterations} iterations ({accepted_moves} accepted, \
         {improving_moves} improving, {infeasible_moves} infeasible): best {best_cost:.6}, \
         final temperature {temperature:.6}"
    );

    SaResult {
        best,
        best_cost,
        best_iteration,
        iterations: total_iterations,
        final_temperature: temperature,
        accepted_moves,
        improving_moves,
        infeasible_moves,
        cancelled,
        stagnated,
        timed_out,
        cost_history,
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &SaConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_max_steps == 0 {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Estimate the number of temperature steps for linear cooling.
fn compute_linear_steps(config: &SaConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 && config.iterations_per_temperature > 0 {
                config.max_iterations / config.iterations_per_temperature
            } else {
                1000
            }
        }
        _ => 0,
    }
}
