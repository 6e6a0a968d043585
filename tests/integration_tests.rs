//! End-to-end tests for the Hamiltonian cycle solver.
//!
//! These exercise the public API only: build a matrix, solve it, and check
//! the closed cycle the way an external scorer would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tsp_anneal::generate::{complete_random, geometric};
use tsp_anneal::sa::{CoolingSchedule, SaConfig};
use tsp_anneal::scoring::{is_hamiltonian_cycle, mean_score, path_cost, score};
use tsp_anneal::solver::InitialTour;
use tsp_anneal::{
    CycleSolver, DistanceMatrix, HamiltonianCycleSolver, InfeasibleReason, InputError,
    SolveError, SolverConfig, Tour,
};

const X: f64 = f64::NAN;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Cheapest closed cycle by enumerating every order that starts at city 0.
fn brute_force(matrix: &DistanceMatrix) -> f64 {
    fn extend(matrix: &DistanceMatrix, order: &mut Vec<usize>, used: &mut [bool], best: &mut f64) {
        let n = matrix.size();
        if order.len() == n {
            let tour = Tour::new(order.clone(), n).expect("permutation");
            *best = best.min(tour.cost(matrix));
            return;
        }
        for city in 1..n {
            if !used[city] {
                used[city] = true;
                order.push(city);
                extend(matrix, order, used, best);
                order.pop();
                used[city] = false;
            }
        }
    }

    let mut best = f64::INFINITY;
    let mut used = vec![false; matrix.size()];
    used[0] = true;
    extend(matrix, &mut vec![0], &mut used, &mut best);
    best
}

#[test]
fn get_solution_on_random_three_city_matrix() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0);
    let rows = (0..3)
        .map(|_| (0..3).map(|_| rng.random_range(0.0..1.0)).collect())
        .collect();
    let solver = HamiltonianCycleSolver::from_rows(rows).expect("valid");

    let cycle = solver.get_solution().expect("feasible");
    assert!(is_hamiltonian_cycle(solver.matrix(), &cycle));
}

#[test]
fn four_city_example_costs_fourteen() {
    init_logging();
    let solver = HamiltonianCycleSolver::from_rows(vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0, 0.0, 4.0, 5.0],
        vec![2.0, 4.0, 0.0, 6.0],
        vec![3.0, 5.0, 6.0, 0.0],
    ])
    .expect("valid");

    let cycle = solver.get_solution().expect("feasible");
    assert_eq!(cycle.len(), 5);
    assert_eq!(cycle[0], cycle[4]);
    assert_eq!(path_cost(solver.matrix(), &cycle), 14.0);
}

#[test]
fn finds_optimum_on_small_random_instances() {
    init_logging();
    for seed in 0..4 {
        let matrix = complete_random(7, seed).expect("valid");
        let optimum = brute_force(&matrix);
        let config = SolverConfig::for_matrix(&matrix).with_restarts(2);
        let solver = HamiltonianCycleSolver::new(matrix)
            .with_config(config)
            .expect("valid config");

        let report = solver.solve_with_report().expect("feasible");
        assert!(
            (report.cost - optimum).abs() < 1e-9,
            "seed {seed}: got {}, optimum {optimum}",
            report.cost
        );
    }
}

#[test]
fn beats_identity_order_on_geometric_instance() {
    init_logging();
    let matrix = geometric(30, 11).expect("valid");
    let identity = Tour::new((0..30).collect(), 30).expect("permutation");
    let baseline = identity.cost(&matrix);

    let solver = HamiltonianCycleSolver::new(matrix);
    let report = solver.solve_with_report().expect("feasible");
    assert!(report.tour.validate(solver.matrix()).is_ok());
    assert!(report.cost < baseline);

    let cycle = report.tour.closed();
    assert!(score(solver.matrix(), &cycle, &identity.closed()) > 100.0);
}

#[test]
fn sparse_ring_has_one_cycle() {
    init_logging();
    // Undirected ring over a shuffled labelling; no chords.
    let n = 10;
    let labels = [3, 7, 0, 9, 4, 1, 8, 2, 6, 5];
    let mut rows = vec![vec![X; n]; n];
    for k in 0..n {
        let (a, b) = (labels[k], labels[(k + 1) % n]);
        rows[a][b] = 1.0;
        rows[b][a] = 1.0;
    }
    let solver = HamiltonianCycleSolver::from_rows(rows).expect("valid");

    let report = solver.solve_with_report().expect("feasible");
    assert_eq!(report.cost, n as f64);
    assert!(report.tour.validate(solver.matrix()).is_ok());
}

#[test]
fn directed_ring_is_followed_forwards() {
    init_logging();
    let n = 6;
    let mut rows = vec![vec![X; n]; n];
    for i in 0..n {
        rows[i][(i + 1) % n] = 2.0;
    }
    let solver = HamiltonianCycleSolver::from_rows(rows)
        .expect("valid")
        .with_config(SolverConfig::default().with_initial_tour(InitialTour::Random))
        .expect("valid config");

    let tour = solver.solve().expect("feasible");
    let rotated = tour.rotated_to(0).expect("city 0 is on the tour");
    assert_eq!(rotated.order(), &[0, 1, 2, 3, 4, 5]);
    assert_eq!(tour.cost(solver.matrix()), 12.0);
}

#[test]
fn infeasible_instances_are_reported() {
    init_logging();
    // City 3 can be entered but never left.
    let sink = HamiltonianCycleSolver::from_rows(vec![
        vec![0.0, 1.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0, 1.0],
        vec![1.0, 1.0, 0.0, 1.0],
        vec![X, X, X, 0.0],
    ])
    .expect("valid");
    assert_eq!(
        sink.solve().unwrap_err(),
        SolveError::Infeasible(InfeasibleReason::IsolatedCity { city: 3 })
    );

    // Two triangles joined by a single bridge edge.
    let mut rows = vec![vec![X; 6]; 6];
    for &(a, b) in &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
        rows[a][b] = 1.0;
        rows[b][a] = 1.0;
    }
    let bridged = HamiltonianCycleSolver::from_rows(rows).expect("valid");
    assert!(matches!(
        bridged.get_solution(),
        Err(SolveError::Infeasible(_))
    ));
}

#[test]
fn malformed_input_is_rejected() {
    assert!(matches!(
        HamiltonianCycleSolver::from_rows(vec![]),
        Err(SolveError::InvalidInput(_))
    ));
    assert!(matches!(
        HamiltonianCycleSolver::from_rows(vec![vec![0.0, 1.0], vec![1.0]]),
        Err(SolveError::InvalidInput(_))
    ));
    assert!(matches!(
        HamiltonianCycleSolver::from_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]]),
        Err(SolveError::InvalidInput(_))
    ));
}

#[test]
fn huge_ragged_input_is_rejected() {
    let err = HamiltonianCycleSolver::from_rows(vec![Vec::new(); 1 << 21]).unwrap_err();
    assert!(matches!(
        err,
        SolveError::InvalidInput(InputError::NotSquare { row: 0, len: 0, .. })
    ));
}

#[test]
fn every_cooling_schedule_terminates_without_budgets() {
    init_logging();
    for cooling in [
        CoolingSchedule::Geometric { alpha: 0.95 },
        CoolingSchedule::Linear,
        CoolingSchedule::LundyMees { beta: 0.1 },
    ] {
        let anneal = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.01)
            .with_cooling(cooling)
            .with_max_iterations(0)
            .with_max_no_improve(0);
        let matrix = complete_random(6, 1).expect("valid");
        let solver = HamiltonianCycleSolver::new(matrix.clone())
            .with_config(SolverConfig::default().with_anneal(anneal).with_seed(3))
            .expect("valid config");

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(solver.solve_with_report());
        });
        let report = rx
            .recv_timeout(Duration::from_secs(30))
            .unwrap_or_else(|_| panic!("{cooling:?} did not terminate"))
            .expect("feasible");
        assert!(report.iterations > 0);
        assert!(report.tour.validate(&matrix).is_ok());
    }
}

#[test]
fn schedule_that_cannot_cool_is_rejected() {
    let anneal = SaConfig::default()
        .with_initial_temperature(1.0)
        .with_min_temperature(0.5)
        .with_cooling(CoolingSchedule::LundyMees { beta: 1e-20 });
    let result = HamiltonianCycleSolver::new(complete_random(5, 0).expect("valid"))
        .with_config(SolverConfig::default().with_anneal(anneal));
    assert!(matches!(result, Err(SolveError::InvalidConfig(_))));
}

#[test]
fn restarts_are_reproducible() {
    init_logging();
    let matrix = geometric(15, 2).expect("valid");
    let config = SolverConfig::default()
        .with_anneal(
            SaConfig::default()
                .with_initial_temperature(0.5)
                .with_min_temperature(0.001)
                .with_max_iterations(3_000),
        )
        .with_restarts(4)
        .with_seed(99);
    let solver = HamiltonianCycleSolver::new(matrix)
        .with_config(config.clone())
        .expect("valid config");

    let first = solver.solve_with_report().expect("feasible");
    let second = solver.solve_with_report().expect("feasible");
    assert_eq!(first.tour, second.tour);
    assert_eq!(first.best_restart, second.best_restart);

    let sequential = solver
        .clone()
        .with_config(config.with_parallel(false))
        .expect("valid config")
        .solve_with_report()
        .expect("feasible");
    assert_eq!(first.tour, sequential.tour);
}

#[test]
fn mean_score_over_a_batch() {
    init_logging();
    let scores: Vec<f64> = (0..3)
        .map(|seed| {
            let matrix = complete_random(6, seed).expect("valid");
            let solver = HamiltonianCycleSolver::new(matrix);
            let cycle = solver.get_solution().expect("feasible");
            score(solver.matrix(), &cycle, &cycle)
        })
        .collect();
    assert_eq!(mean_score(scores), Some(100.0));
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() {
    let solver = HamiltonianCycleSolver::from_rows(vec![
        vec![0.0, 1.0, f64::INFINITY],
        vec![1.0, 0.0, 2.0],
        vec![3.0, 2.0, 0.0],
    ])
    .expect("valid");

    let config_json = serde_json::to_string(solver.config()).expect("serialize");
    let config: SolverConfig = serde_json::from_str(&config_json).expect("deserialize");
    assert_eq!(&config, solver.config());

    let tour = solver.solve().expect("feasible");
    let tour_json = serde_json::to_string(&tour).expect("serialize");
    let back: Tour = serde_json::from_str(&tour_json).expect("deserialize");
    assert_eq!(back, tour);

    let bad: Result<DistanceMatrix, _> = serde_json::from_str("[[0.0, 1.0], [1.0]]");
    assert!(bad.is_err());
}
