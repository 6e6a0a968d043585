//! Solver configuration.

use crate::distance::DistanceMatrix;
use crate::sa::{CoolingSchedule, SaConfig};

/// Seed used when no seed is configured, so that default solves are
/// reproducible.
pub const DEFAULT_SEED: u64 = 42;

/// How the first tour of each restart is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialTour {
    /// Nearest-neighbor walk with backtracking. Restart `r` starts at city
    /// `r % n`.
    #[default]
    NearestNeighbor,

    /// A random order; if it uses a disconnected edge it is replaced by the
    /// nearest-neighbor search from its first city.
    Random,
}

/// Configuration for [`HamiltonianCycleSolver`](super::HamiltonianCycleSolver).
///
/// # Examples
///
/// ```
/// use tsp_anneal::sa::SaConfig;
/// use tsp_anneal::solver::{InitialTour, SolverConfig};
///
/// let config = SolverConfig::default()
///     .with_anneal(SaConfig::default().with_max_iterations(10_000))
///     .with_initial_tour(InitialTour::Random)
///     .with_restarts(4)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.anneal.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Annealing parameters shared by every restart. Restart `r` runs with
    /// seed `anneal.seed + r`.
    pub anneal: SaConfig,

    /// Construction of the starting tour.
    pub initial_tour: InitialTour,

    /// Number of independent annealing runs. The cheapest result wins;
    /// ties go to the lowest restart index.
    pub restarts: usize,

    /// Whether to finish each run with deterministic 2-opt descent.
    pub polish: bool,

    /// Upper bound on 2-opt passes per run.
    pub max_polish_passes: usize,

    /// Upper bound on search nodes when building a feasible starting tour.
    pub search_budget: usize,

    /// Whether to run restarts on the rayon thread pool.
    ///
    /// Has no effect unless the `parallel` feature is enabled. The result
    /// does not depend on this flag.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            anneal: SaConfig::default().with_seed(DEFAULT_SEED),
            initial_tour: InitialTour::default(),
            restarts: 1,
            polish: true,
            max_polish_passes: 50,
            search_budget: 1_000_000,
            parallel: true,
        }
    }
}

impl SolverConfig {
    /// A configuration scaled to `matrix`.
    ///
    /// The starting temperature is the mean connected distance, so that an
    /// average uphill move is accepted with probability `1/e` at first, and
    /// cooling stops four orders of magnitude lower. The iteration budget
    /// grows with the number of cities and is spread over the cooling
    /// schedule.
    pub fn for_matrix(matrix: &DistanceMatrix) -> Self {
        let n = matrix.size();
        let scale = matrix
            .mean_distance()
            .filter(|&mean| mean > 0.0)
            .unwrap_or(1.0);

        let alpha: f64 = 0.95;
        let ratio: f64 = 1e-4;
        let steps = (ratio.ln() / alpha.ln()).ceil() as usize;
        let budget = (n * 2_000).clamp(20_000, 400_000);

        let anneal = SaConfig::default()
            .with_initial_temperature(scale)
            .with_min_temperature(scale * ratio)
            .with_cooling(CoolingSchedule::Geometric { alpha })
            .with_iterations_per_temperature((budget / steps).max(1))
            .with_max_iterations(budget)
            .with_max_no_improve(budget / 2)
            .with_seed(DEFAULT_SEED);

        Self {
            anneal,
            ..Self::default()
        }
    }

    pub fn with_anneal(mut self, anneal: SaConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_initial_tour(mut self, initial_tour: InitialTour) -> Self {
        self.initial_tour = initial_tour;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    pub fn with_max_polish_passes(mut self, passes: usize) -> Self {
        self.max_polish_passes = passes;
        self
    }

    pub fn with_search_budget(mut self, budget: usize) -> Self {
        self.search_budget = budget;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.anneal.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.anneal.validate()?;
        if self.restarts == 0 {
            return Err("restarts must be at least 1".into());
        }
        if self.search_budget == 0 {
            return Err("search_budget must be at least 1".into());
        }
        Ok(())
    }
}
