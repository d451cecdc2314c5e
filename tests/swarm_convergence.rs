//! End-to-end convergence tests for the swarm and simplex solvers

use approx::assert_abs_diff_eq;
use simplex_swarm::prelude::*;

fn paraboloid_config(stopping: bool, acceptance_error: f64) -> SwarmConfig {
    SwarmConfig::builder()
        .lower_bound(vec![-20.0, -20.0])
        .upper_bound(vec![10.0, 10.0])
        .num_particles(500)
        .max_epochs(1000)
        .acceptance_error(acceptance_error)
        .stopping_enabled(stopping)
        .seed(2024)
        .build()
        .unwrap()
}

#[test]
fn test_simplex_bowl() {
    let bowl = |x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] - 2.0).powi(2);
    let result = NelderMead::new(SimplexConfig::new(1e-8, 1000))
        .minimize(&bowl, &[0.0, 0.0], None)
        .unwrap();

    assert_eq!(result.exit_reason(), ExitReason::Converged);
    assert_abs_diff_eq!(result.point()[0], 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.point()[1], 2.0, epsilon = 1e-6);
}

#[test]
fn test_swarm_minimizes_shifted_paraboloid() {
    let objective = ShiftedParaboloid::new();
    let optimum = objective.optimal_solution().unwrap();
    let config = paraboloid_config(false, 1e-9);
    let mut swarm = ParticleSwarm::minimizing(objective.clone(), config);
    let result = swarm.solve().unwrap();

    assert!(result.success);
    assert_eq!(result.epochs, 1000);
    assert_eq!(result.termination, TerminationReason::EpochBudgetExhausted);
    assert_abs_diff_eq!(result.best_position[0], optimum[0], epsilon = 1e-6);
    assert_abs_diff_eq!(result.best_position[1], optimum[1], epsilon = 1e-6);
    assert_abs_diff_eq!(result.best_fitness, objective.optimal_fitness(), epsilon = 1e-9);
}

#[test]
fn test_swarm_maximizes_negated_paraboloid() {
    let objective = Negated::new(ShiftedParaboloid::new());
    let mut swarm = ParticleSwarm::maximizing(objective, paraboloid_config(false, 1e-9));
    let result = swarm.solve().unwrap();

    assert_abs_diff_eq!(result.best_position[0], 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.best_position[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.best_fitness, -100.0, epsilon = 1e-9);
}

#[test]
fn test_stopping_criteria_end_solve_early() {
    let config = paraboloid_config(true, 1e-6);
    let mut swarm = ParticleSwarm::minimizing(ShiftedParaboloid::new(), config);
    let result = swarm.solve().unwrap();

    assert_eq!(result.termination, TerminationReason::CriteriaMet);
    assert!(result.epochs < 1000);
    assert!(result.epochs >= HISTORY_WINDOW);
    assert_abs_diff_eq!(result.best_fitness, 100.0, epsilon = 1e-3);
}

#[test]
fn test_observer_sees_every_non_final_epoch() {
    let config = SwarmConfig::builder()
        .lower_bound(vec![-20.0, -20.0])
        .upper_bound(vec![10.0, 10.0])
        .num_particles(50)
        .max_epochs(40)
        .seed(5)
        .build()
        .unwrap();
    let mut swarm = ParticleSwarm::minimizing(ShiftedParaboloid::new(), config);

    let mut observed = Vec::new();
    let result = swarm
        .solve_with_observer(|snapshot| observed.push(snapshot.best_fitness))
        .unwrap();

    // budget exhaustion is not a stop by criteria, so every epoch is reported
    assert_eq!(observed.len(), 40);
    assert_eq!(observed, result.best_fitness_history());
}

#[test]
fn test_hybrid_swarm_refines_elites() {
    let objective = ShiftedParaboloid::with_center(5.0, vec![1.0, -2.0, 0.5]);
    let config = SwarmConfig::builder()
        .bounds(objective.search_space())
        .num_particles(30)
        .max_epochs(20)
        .seed(11)
        .build()
        .unwrap();

    let mut plain = ParticleSwarm::minimizing(objective.clone(), config.clone());
    let plain_result = plain.solve().unwrap();

    let mut hybrid = ParticleSwarm::hybrid(Minimize, objective, config);
    let hybrid_result = hybrid.solve().unwrap();

    assert!(hybrid_result.evaluations > plain_result.evaluations);
    assert_abs_diff_eq!(hybrid_result.best_position[0], 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(hybrid_result.best_position[1], -2.0, epsilon = 1e-4);
    assert_abs_diff_eq!(hybrid_result.best_position[2], 0.5, epsilon = 1e-4);
}

#[test]
fn test_hybrid_rosenbrock_from_json_config() {
    let json = r#"{
        "bounds": { "bounds": [ { "min": -5.0, "max": 10.0 }, { "min": -5.0, "max": 10.0 } ] },
        "num_particles": 40,
        "max_epochs": 150,
        "engine": "mersenne_twister",
        "seed": 17,
        "refine_every": 5
    }"#;
    let config = SwarmConfig::from_json(json).unwrap();
    let objective = Rosenbrock::new(2);
    let optimal = objective.optimal_fitness();
    let mut swarm = ParticleSwarm::hybrid(Minimize, objective, config);
    let result = swarm.solve().unwrap();

    assert!(result.best_fitness - optimal < 1e-3);
    assert_abs_diff_eq!(result.best_position[0], 1.0, epsilon = 5e-2);
    assert_abs_diff_eq!(result.best_position[1], 1.0, epsilon = 1e-1);
}

#[test]
fn test_multistart_finds_global_minimum() {
    let minimizer =
        NelderMeadMinimizer::new(Rastrigin::new(2), MultiBounds::symmetric(5.12, 2)).unwrap();
    let best = minimizer.minimize_multiple_with_perturbations_parallel(64).unwrap();

    assert!(best.value() < 1.0);
    let solutions = minimizer.solutions();
    assert!(!solutions.is_empty() && solutions.len() <= 64);
    assert!(solutions.iter().all(|s| best.value() <= s.value()));
    assert_eq!(minimizer.best_solution().unwrap(), best);
}

#[test]
fn test_high_dimensional_hammersley_rejected() {
    let bounds = MultiBounds::symmetric(1.0, 21);
    assert_eq!(
        hammersley(8, &bounds),
        Err(SpaceError::DimensionOutOfRange {
            requested: 21,
            available: 20
        })
    );

    let minimizer = NelderMeadMinimizer::new(Sphere::new(21), bounds).unwrap();
    assert!(matches!(
        minimizer.minimize_multiple_with_perturbations(8),
        Err(OptimizationError::Space(SpaceError::DimensionOutOfRange { .. }))
    ));
}

#[test]
fn test_result_json_export() {
    let config = SwarmConfig::create_default(20, 10, &[-20.0, -20.0], &[10.0, 10.0], 1e-9).unwrap();
    let result = ParticleSwarm::minimizing(ShiftedParaboloid::new(), config)
        .solve()
        .unwrap();
    let json = result.to_json().unwrap();
    assert!(json.contains("\"best_position\""));
    assert!(json.contains("\"epoch_budget_exhausted\""));
}
