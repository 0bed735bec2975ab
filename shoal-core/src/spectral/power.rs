//! Power iteration over the shifted normalized Laplacian.
//!
//! Classic power method with a seeded random initial vector and delta-norm
//! convergence: the iteration stops once the L2 distance between successive
//! normalized iterates drops below the configured tolerance. The iteration
//! budget is hard-bounded so numerical pathologies (near-degenerate spectra,
//! weakly coupled components) terminate instead of spinning.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::trace;

use super::laplacian::ShiftedNormalizedLaplacian;

/// An error raised by the eigensolver.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PowerIterationError {
    /// The iteration budget was exhausted before convergence.
    #[error("eigensolver exceeded {max_iterations} iterations")]
    MaxIterationsExceeded {
        /// The configured iteration budget.
        max_iterations: usize,
    },
}

impl PowerIterationError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> PowerIterationErrorCode {
        match self {
            Self::MaxIterationsExceeded { .. } => PowerIterationErrorCode::MaxIterationsExceeded,
        }
    }
}

/// Machine-readable error codes for [`PowerIterationError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PowerIterationErrorCode {
    /// The iteration budget was exhausted before convergence.
    MaxIterationsExceeded,
}

impl PowerIterationErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxIterationsExceeded => "POWER_ITERATION_MAX_ITERATIONS_EXCEEDED",
        }
    }
}

/// Generates the deterministic initial vector for a given seed and size.
///
/// Entries are uniform in `[-1, 1]` and normalized to unit length. The
/// operator projects out the trivial eigenvector on every application, so no
/// explicit orthogonalization is needed.
pub(crate) fn initial_vector(seed: u64, order: usize) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut vec: Vec<f64> = (0..order).map(|_| rng.gen_range(-1.0..=1.0)).collect();
    normalize(&mut vec);
    vec
}

/// Runs the power iteration until convergence.
///
/// # Errors
/// Returns [`PowerIterationError::MaxIterationsExceeded`] when the budget is
/// exhausted before the delta norm drops below `tolerance`.
pub(crate) fn power_iteration(
    operator: &ShiftedNormalizedLaplacian<'_>,
    initial: Vec<f64>,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>, PowerIterationError> {
    let order = operator.order();
    let mut x = initial;
    let mut y = vec![0.0; order];
    for iteration in 0..max_iterations {
        operator.apply(&x, &mut y);
        normalize(&mut y);
        let delta = l2_distance(&x, &y);
        std::mem::swap(&mut x, &mut y);
        if delta < tolerance {
            trace!(order, iterations = iteration + 1, "power iteration converged");
            return Ok(x);
        }
    }
    Err(PowerIterationError::MaxIterationsExceeded { max_iterations })
}

fn normalize(vec: &mut [f64]) {
    let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
