//! Property-based tests for simplex-swarm
//!
//! Uses proptest to verify invariants and properties of the library.

use proptest::prelude::*;
use simplex_swarm::prelude::*;

fn bounds_strategy(max_dim: usize) -> impl Strategy<Value = MultiBounds> {
    prop::collection::vec((-100.0..100.0f64, 0.0..50.0f64), 1..=max_dim).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(min, width)| (min, min + width))
            .collect()
    })
}

proptest! {
    // ==================== Hammersley Properties ====================

    #[test]
    fn hammersley_points_within_bounds(
        bounds in bounds_strategy(MAX_DIMENSION),
        n in 1usize..200
    ) {
        let points = hammersley(n, &bounds).unwrap();
        prop_assert_eq!(points.len(), n);
        for point in &points {
            prop_assert!(bounds.contains_vec(point));
        }
    }

    #[test]
    fn hammersley_deterministic(
        bounds in bounds_strategy(MAX_DIMENSION),
        n in 1usize..100
    ) {
        prop_assert_eq!(hammersley(n, &bounds).unwrap(), hammersley(n, &bounds).unwrap());
    }

    #[test]
    fn hammersley_rejects_high_dimensions(dim in (MAX_DIMENSION + 1)..40usize) {
        let bounds = MultiBounds::symmetric(1.0, dim);
        prop_assert_eq!(
            hammersley(10, &bounds),
            Err(SpaceError::DimensionOutOfRange { requested: dim, available: MAX_DIMENSION })
        );
    }

    #[test]
    fn radical_inverse_in_unit_interval(n in 0u64..1_000_000, base_index in 0usize..20) {
        let v = radical_inverse(n, simplex_swarm::space::hammersley::PRIMES[base_index]);
        prop_assert!((0.0..1.0).contains(&v));
    }

    // ==================== Random Engine Properties ====================

    #[test]
    fn reseeded_engines_reproduce(seed in any::<u64>(), k in 1usize..200) {
        for kind in [EngineKind::Default, EngineKind::MersenneTwister] {
            let mut a = kind.create(Some(seed));
            let mut b = kind.create(Some(seed));
            let first: Vec<f64> = (0..k).map(|_| a.next_f64()).collect();
            let second: Vec<f64> = (0..k).map(|_| b.next_f64()).collect();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn engine_deviates_in_unit_interval(seed in any::<u64>()) {
        let mut engine = MersenneTwisterEngine::seeded(seed);
        for _ in 0..100 {
            let v = engine.next_f64();
            prop_assert!((0.0..1.0).contains(&v));
        }
    }

    // ==================== Bounds Properties ====================

    #[test]
    fn clamp_lands_inside(
        bounds in bounds_strategy(10),
        raw in prop::collection::vec(prop::num::f64::ANY, 10)
    ) {
        let mut values = raw[..bounds.dimension()].to_vec();
        bounds.clamp_vec(&mut values);
        prop_assert!(bounds.contains_vec(&values));
    }

    #[test]
    fn random_particles_within_bounds(bounds in bounds_strategy(10), seed in any::<u64>()) {
        let mut engine = MersenneTwisterEngine::seeded(seed);
        let particle = Particle::random::<Minimize, _>(&bounds, &mut engine);
        prop_assert!(bounds.contains_vec(&particle.position));
        for (v, b) in particle.velocity.iter().zip(bounds.iter()) {
            prop_assert!(v.abs() <= b.range());
        }
    }

    #[test]
    fn extreme_velocity_clamped_exactly(
        bounds in bounds_strategy(5),
        seed in any::<u64>(),
        inertia in prop_oneof![Just(1e300), Just(-1e300)]
    ) {
        let mut engine = DefaultEngine::seeded(seed);
        let mut particle = Particle::random::<Minimize, _>(&bounds, &mut engine);
        particle.velocity.iter_mut().for_each(|v| *v = 1e300);
        let global = bounds.lower();
        particle.advance(&Coefficients::new(inertia, 1.49445, 1.49445), &global, &bounds, &mut engine);

        for (x, b) in particle.position.iter().zip(bounds.iter()) {
            prop_assert!(*x == b.min || *x == b.max);
        }
    }

    // ==================== Simplex Properties ====================

    #[test]
    fn simplex_never_worse_than_guess(
        guess in prop::collection::vec(-10.0..10.0f64, 1..5),
        shift in -5.0..5.0f64
    ) {
        let bowl = move |x: &[f64]| x.iter().map(|xi| (xi - shift).powi(2)).sum::<f64>();
        let result = NelderMead::new(SimplexConfig::new(1e-8, 200))
            .minimize(&bowl, &guess, None)
            .unwrap();
        prop_assert!(result.value() <= bowl(&guess));
        prop_assert_eq!(result.point().len(), guess.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // ==================== Swarm Properties ====================

    #[test]
    fn global_best_never_worsens(seed in any::<u64>(), parallel in any::<bool>()) {
        let config = SwarmConfig::builder()
            .bounds(MultiBounds::symmetric(5.12, 3))
            .num_particles(15)
            .max_epochs(25)
            .parallel(parallel)
            .seed(seed)
            .build()
            .unwrap();
        let result = ParticleSwarm::minimizing(Rastrigin::new(3), config).solve().unwrap();
        let history = result.best_fitness_history();
        prop_assert!(history.windows(2).all(|w| w[1] <= w[0]));

        let config = SwarmConfig::builder()
            .bounds(MultiBounds::symmetric(5.12, 3))
            .num_particles(15)
            .max_epochs(25)
            .seed(seed)
            .build()
            .unwrap();
        let result = ParticleSwarm::maximizing(Negated::new(Rastrigin::new(3)), config)
            .solve()
            .unwrap();
        let history = result.best_fitness_history();
        prop_assert!(history.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn result_dominates_personal_bests(seed in any::<u64>()) {
        let config = SwarmConfig::builder()
            .bounds(MultiBounds::symmetric(5.0, 2))
            .num_particles(12)
            .max_epochs(15)
            .seed(seed)
            .build()
            .unwrap();
        let mut swarm = ParticleSwarm::hybrid(Minimize, Sphere::new(2), config);
        let result = swarm.solve().unwrap();
        for particle in swarm.last_state().unwrap().particles() {
            prop_assert!(result.best_fitness <= particle.best_fitness);
        }
        prop_assert!(MultiBounds::symmetric(5.0, 2).contains_vec(&result.best_position));
    }
}
