//! Multi-start Nelder-Mead
//!
//! This example spreads Nelder-Mead starting points over the Rastrigin
//! search box with the Hammersley sequence and keeps the best local minimum.

use simplex_swarm::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Multi-start Nelder-Mead: Rastrigin ===\n");

    const DIM: usize = 3;
    const STARTS: usize = 128;

    let objective = Rastrigin::new(DIM);
    let bounds = objective.search_space();
    let minimizer = NelderMeadMinimizer::with_config(
        objective,
        bounds,
        SimplexConfig::new(1e-8, 2_000),
        DEFAULT_PERTURBATION_SCALE,
    )?;

    // A single start usually stalls in the nearest local minimum
    let single = minimizer.minimize(&[3.0, -2.5, 1.5])?;
    println!("Single start:  {:.6} at {:?}", single.value(), single.point());

    minimizer.clear();
    let best = minimizer.minimize_multiple_with_perturbations_parallel(STARTS)?;
    let converged = minimizer
        .solutions()
        .iter()
        .filter(|s| s.is_converged())
        .count();

    println!("Multi-start:   {:.6} at {:?}", best.value(), best.point());
    println!("  Starts:      {}", STARTS);
    println!("  Converged:   {}", converged);
    println!("  Exit reason: {:?}", best.exit_reason());

    Ok(())
}
