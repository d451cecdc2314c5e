//! Single-start downhill simplex

use log::debug;

use crate::error::{OptResult, SpaceError};
use crate::fitness::traits::Objective;
use crate::simplex::{ExitReason, MinimizationResult, SimplexConfig};

/// Added to the convergence denominator so a zero minimum can converge
const JITTER: f64 = 1e-10;
const REFLECTION: f64 = -1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
/// Consecutive converged checks required before stopping
const CONVERGED_CHECKS: usize = 2;

/// Nelder-Mead minimizer
///
/// Each call to [`minimize`](Self::minimize) builds and owns a fresh
/// simplex, so one instance can serve concurrent runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NelderMead {
    config: SimplexConfig,
}

impl NelderMead {
    /// Create a minimizer with the given tolerance and budget
    pub fn new(config: SimplexConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Initial edge lengths used when no perturbation is supplied:
    /// 1 along zero coordinates, 10% of the coordinate otherwise.
    pub fn default_perturbation(guess: &[f64]) -> Vec<f64> {
        guess
            .iter()
            .map(|&g| if g == 0.0 { 1.0 } else { 0.1 * g })
            .collect()
    }

    /// Minimize `objective` starting from `guess`
    ///
    /// The initial simplex is `guess` plus one vertex per dimension displaced
    /// by the matching `perturbation` entry. Running out of iterations is
    /// reported through [`ExitReason::ExceededIterations`], not as an error.
    pub fn minimize<O: Objective + ?Sized>(
        &self,
        objective: &O,
        guess: &[f64],
        perturbation: Option<&[f64]>,
    ) -> OptResult<MinimizationResult> {
        self.config.validate()?;
        if guess.is_empty() {
            return Err(SpaceError::EmptySpace.into());
        }

        let steps = match perturbation {
            Some(p) if p.len() != guess.len() => {
                return Err(SpaceError::DimensionMismatch {
                    expected: guess.len(),
                    actual: p.len(),
                }
                .into());
            }
            Some(p) => p.to_vec(),
            None => Self::default_perturbation(guess),
        };

        let mut simplex = Simplex::new(objective, guess, &steps);
        let mut iterations = 0;
        let mut agreeing = 0;

        let exit_reason = loop {
            let ranking = simplex.rank();
            let lowest = simplex.values[ranking.lowest];
            if lowest.is_nan() {
                break ExitReason::Failure;
            }

            if has_converged(
                self.config.convergence_tolerance,
                lowest,
                simplex.values[ranking.highest],
            ) {
                agreeing += 1;
                if agreeing >= CONVERGED_CHECKS {
                    break ExitReason::Converged;
                }
            } else {
                agreeing = 0;
            }

            if iterations >= self.config.max_iterations {
                break ExitReason::ExceededIterations;
            }

            iterations += 1;
            simplex.step(objective, &ranking);
        };

        let best = simplex.rank().lowest;
        debug!(
            "Nelder-Mead finished: {:?} after {} iterations, {} evaluations, value {}",
            exit_reason, iterations, simplex.evaluations, simplex.values[best]
        );

        Ok(MinimizationResult::new(
            simplex.vertices.swap_remove(best),
            simplex.values[best],
            iterations,
            simplex.evaluations,
            exit_reason,
        ))
    }
}

/// Relative spread test between the best and worst vertex values
fn has_converged(tolerance: f64, lowest: f64, highest: f64) -> bool {
    let range = 2.0 * (highest - lowest).abs();
    let scale = highest.abs() + lowest.abs() + JITTER;
    range / scale < tolerance
}

/// NaN sorts after every number
fn key(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

struct Ranking {
    lowest: usize,
    next_highest: usize,
    highest: usize,
}

struct Simplex {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
    evaluations: usize,
}

impl Simplex {
    fn new<O: Objective + ?Sized>(objective: &O, guess: &[f64], steps: &[f64]) -> Self {
        let mut vertices = Vec::with_capacity(guess.len() + 1);
        vertices.push(guess.to_vec());
        for (i, step) in steps.iter().enumerate() {
            let mut vertex = guess.to_vec();
            vertex[i] += step;
            vertices.push(vertex);
        }

        let values: Vec<f64> = vertices.iter().map(|v| objective.evaluate(v)).collect();
        let evaluations = values.len();

        Self {
            vertices,
            values,
            evaluations,
        }
    }

    fn rank(&self) -> Ranking {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| key(self.values[a]).total_cmp(&key(self.values[b])));
        let n = order.len() - 1;

        Ranking {
            lowest: order[0],
            next_highest: order[n - 1],
            highest: order[n],
        }
    }

    fn centroid(&self, excluded: usize) -> Vec<f64> {
        let dimension = self.vertices[0].len();
        let mut centroid = vec![0.0; dimension];
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i == excluded {
                continue;
            }
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        let count = (self.vertices.len() - 1) as f64;
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    /// Scale the worst vertex about the centroid, keeping the new point if it
    /// improves on the vertex it would replace. Returns the new point's value.
    fn scale_worst<O: Objective + ?Sized>(
        &mut self,
        objective: &O,
        centroid: &[f64],
        worst: usize,
        factor: f64,
    ) -> f64 {
        let candidate: Vec<f64> = centroid
            .iter()
            .zip(&self.vertices[worst])
            .map(|(c, w)| c + factor * (w - c))
            .collect();
        let value = objective.evaluate(&candidate);
        self.evaluations += 1;

        if key(value) < key(self.values[worst]) {
            self.vertices[worst] = candidate;
            self.values[worst] = value;
        }
        value
    }

    fn shrink<O: Objective + ?Sized>(&mut self, objective: &O, lowest: usize) {
        let anchor = self.vertices[lowest].clone();
        for i in 0..self.vertices.len() {
            if i == lowest {
                continue;
            }
            for (x, a) in self.vertices[i].iter_mut().zip(&anchor) {
                *x = 0.5 * (*x + a);
            }
            self.values[i] = objective.evaluate(&self.vertices[i]);
            self.evaluations += 1;
        }
    }

    fn step<O: Objective + ?Sized>(&mut self, objective: &O, ranking: &Ranking) {
        let centroid = self.centroid(ranking.highest);
        let reflected = key(self.scale_worst(objective, &centroid, ranking.highest, REFLECTION));

        if reflected <= key(self.values[ranking.lowest]) {
            self.scale_worst(objective, &centroid, ranking.highest, EXPANSION);
        } else if reflected >= key(self.values[ranking.next_highest]) {
            let worst = key(self.values[ranking.highest]);
            let contracted = key(self.scale_worst(objective, &centroid, ranking.highest, CONTRACTION));
            if contracted >= worst {
                self.shrink(objective, ranking.lowest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimizationError;
    use crate::fitness::benchmarks::Rosenbrock;
    use approx::assert_abs_diff_eq;

    fn bowl(x: &[f64]) -> f64 {
        (x[0] - 3.0).powi(2) + (x[1] - 2.0).powi(2)
    }

    #[test]
    fn test_converges_on_bowl() {
        let solver = NelderMead::new(SimplexConfig::new(1e-8, 1000));
        let result = solver.minimize(&bowl, &[0.0, 0.0], None).unwrap();

        assert_eq!(result.exit_reason(), ExitReason::Converged);
        assert_abs_diff_eq!(result.point()[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.point()[1], 2.0, epsilon = 1e-6);
        assert!(result.iterations() < 1000);
        assert!(result.evaluations() > result.iterations());
    }

    #[test]
    fn test_converges_on_rosenbrock() {
        let solver = NelderMead::new(SimplexConfig::new(1e-10, 10_000));
        let result = solver
            .minimize(&Rosenbrock::new(2), &[-1.2, 1.0], None)
            .unwrap();

        assert!(result.is_converged());
        assert_abs_diff_eq!(result.point()[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.point()[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_one_dimension() {
        let f = |x: &[f64]| (x[0] + 4.0).powi(2) + 1.0;
        let result = NelderMead::default().minimize(&f, &[10.0], None).unwrap();
        assert!(result.is_converged());
        assert_abs_diff_eq!(result.point()[0], -4.0, epsilon = 1e-2);
        assert_abs_diff_eq!(result.value(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_budget_exhaustion_is_not_an_error() {
        let solver = NelderMead::new(SimplexConfig::new(1e-12, 5));
        let result = solver.minimize(&bowl, &[0.0, 0.0], None).unwrap();

        assert_eq!(result.exit_reason(), ExitReason::ExceededIterations);
        assert_eq!(result.iterations(), 5);
        assert!(result.value() < bowl(&[0.0, 0.0]));
    }

    #[test]
    fn test_zero_budget_returns_best_initial_vertex() {
        let solver = NelderMead::new(SimplexConfig::new(1e-12, 0));
        let result = solver.minimize(&bowl, &[0.0, 0.0], None).unwrap();

        assert_eq!(result.exit_reason(), ExitReason::ExceededIterations);
        assert_eq!(result.iterations(), 0);
        assert_eq!(result.evaluations(), 3);
        // Vertices are (0,0), (1,0), (0,1); (1,0) is the lowest at 8.0
        assert_eq!(result.point(), &[1.0, 0.0]);
    }

    #[test]
    fn test_explicit_perturbation() {
        let solver = NelderMead::new(SimplexConfig::new(1e-10, 2000));
        let result = solver
            .minimize(&bowl, &[100.0, -50.0], Some(&[5.0, 5.0]))
            .unwrap();
        assert!(result.is_converged());
        assert_abs_diff_eq!(result.point()[0], 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.point()[1], 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perturbation_dimension_mismatch() {
        let err = NelderMead::default()
            .minimize(&bowl, &[0.0, 0.0], Some(&[1.0]))
            .unwrap_err();
        assert_eq!(
            err,
            OptimizationError::Space(SpaceError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_empty_guess_rejected() {
        let err = NelderMead::default().minimize(&bowl, &[], None).unwrap_err();
        assert_eq!(err, OptimizationError::Space(SpaceError::EmptySpace));
    }

    #[test]
    fn test_nan_objective_fails() {
        let f = |_: &[f64]| f64::NAN;
        let result = NelderMead::default().minimize(&f, &[1.0, 1.0], None).unwrap();
        assert_eq!(result.exit_reason(), ExitReason::Failure);
        assert_eq!(result.iterations(), 0);
    }

    #[test]
    fn test_default_perturbation() {
        assert_eq!(
            NelderMead::default_perturbation(&[0.0, 10.0, -2.0]),
            vec![1.0, 1.0, -0.2]
        );
    }

    #[test]
    fn test_has_converged() {
        assert!(has_converged(1e-6, 0.0, 0.0));
        assert!(has_converged(1e-6, 100.0, 100.00000001));
        assert!(!has_converged(1e-6, 1.0, 2.0));
        assert!(!has_converged(1e-6, 1.0, f64::INFINITY));
    }
}
