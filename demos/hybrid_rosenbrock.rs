//! Hybrid Swarm on Rosenbrock
//!
//! This example compares a plain particle swarm with the hybrid solver that
//! refines its elite particles by Nelder-Mead on the Rosenbrock function.
//!
//! Rosenbrock's minimum lies at the end of a long curved valley that swarms
//! find quickly but crawl along slowly, which is where local refinement pays
//! off.

use simplex_swarm::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hybrid Swarm: Rosenbrock ===\n");

    const DIM: usize = 4;

    let objective = Rosenbrock::new(DIM);
    let config = SwarmConfig::builder()
        .bounds(objective.search_space())
        .num_particles(60)
        .max_epochs(300)
        .acceptance_error(1e-10)
        .stopping_enabled(true)
        .engine(EngineKind::MersenneTwister)
        .seed(12345)
        .refine_every(10)
        .build()?;

    println!("Problem: {} ({} dimensions)", objective.name(), DIM);
    println!(
        "Global optimum: {} at {:?}\n",
        objective.optimal_fitness(),
        objective.optimal_solution().unwrap_or_default()
    );

    let plain = ParticleSwarm::minimizing(objective.clone(), config.clone()).solve()?;

    // Print progress every 50 epochs
    let mut hybrid = ParticleSwarm::hybrid(Minimize, objective, config);
    let result = hybrid.solve_with_observer(|snapshot| {
        if snapshot.epoch % 50 == 0 {
            println!("  Epoch {:4}: {:.3e}", snapshot.epoch, snapshot.best_fitness);
        }
    })?;

    println!("\nPlain swarm:");
    println!("  Best fitness:   {:.6e}", plain.best_fitness);
    println!("  Epochs:         {}", plain.epochs);
    println!("  Evaluations:    {}", plain.evaluations);

    println!("\nHybrid swarm:");
    println!("{}", result.summary());

    Ok(())
}
