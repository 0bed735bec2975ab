//! Spectral bisection.
//!
//! A connected graph is split in two along its Fiedler direction: the power
//! iteration recovers the eigenvector associated with the second-smallest
//! eigenvalue of the normalized Laplacian, vertices are sorted by their
//! eigenvector entry, and the cheapest normalized cut over all admissible
//! prefix positions decides the partition. Positions that would leave either
//! side below the minimum cluster size are not admissible, and the winning
//! position must still improve on not splitting at all — its normalized cut
//! has to stay below [`MAX_BENEFICIAL_NCUT`]. When no position qualifies the
//! graph is reported as unsplittable and becomes a leaf.

mod laplacian;
mod power;

pub use self::power::{PowerIterationError, PowerIterationErrorCode};

use tracing::trace;

use crate::graph::SparseGraph;
use crate::settings::ClusteringSettings;

use self::laplacian::ShiftedNormalizedLaplacian;
use self::power::{initial_vector, power_iteration};

/// Largest normalized cut still considered an improvement over keeping the
/// graph whole. `cut/vol(S) + cut/vol(S̄)` reaches 2 when a side consists of
/// nothing but cut edges; requiring less than 1 means the winning side keeps
/// a majority of its volume internal, which is what makes a split worth a
/// recursion level. Tightly knit graphs (cliques, stars) never pass and
/// terminate as leaves.
pub const MAX_BENEFICIAL_NCUT: f64 = 1.0;

/// The outcome of a bisection attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Bisection {
    /// The graph was split into two admissible sides.
    Split {
        /// Root-graph vertex ids of the low-signal side, sorted.
        left: Vec<usize>,
        /// Root-graph vertex ids of the high-signal side, sorted.
        right: Vec<usize>,
        /// Per-vertex signal values, indexed by the input graph's local ids.
        signal: Vec<f64>,
    },
    /// No admissible split improves on keeping the graph whole.
    NoSplit,
}

/// Splits connected graphs along their Fiedler direction.
#[derive(Clone, Debug)]
pub struct SpectralBisector {
    min_cluster_size: usize,
    max_iterations: usize,
    convergence_tolerance: f64,
    random_seed: u64,
}

impl SpectralBisector {
    /// Creates a bisector from clustering settings.
    #[must_use]
    pub fn new(settings: &ClusteringSettings) -> Self {
        Self {
            min_cluster_size: settings.min_cluster_size().get(),
            max_iterations: settings.max_iterations(),
            convergence_tolerance: settings.convergence_tolerance(),
            random_seed: settings.random_seed(),
        }
    }

    /// Attempts to bisect a connected graph.
    ///
    /// # Errors
    /// Returns [`PowerIterationError::MaxIterationsExceeded`] when the
    /// eigensolver fails to converge within its budget; callers decide
    /// whether that degrades the node to a leaf or aborts the run.
    pub fn bisect(&self, graph: &SparseGraph) -> Result<Bisection, PowerIterationError> {
        let order = graph.order();
        if order < 2 * self.min_cluster_size || order < 2 {
            return Ok(Bisection::NoSplit);
        }
        // A single edge always cuts its entire volume; no need to solve.
        if order == 2 {
            return Ok(Bisection::NoSplit);
        }

        let operator = ShiftedNormalizedLaplacian::new(graph);
        let initial = initial_vector(self.random_seed, order);
        let converged = power_iteration(
            &operator,
            initial,
            self.max_iterations,
            self.convergence_tolerance,
        )?;
        let signal = operator.to_fiedler(&converged);

        let mut by_signal: Vec<usize> = (0..order).collect();
        by_signal.sort_unstable_by(|&a, &b| signal[a].total_cmp(&signal[b]).then(a.cmp(&b)));

        match self.sweep_cut(graph, &by_signal) {
            Some(split_at) => {
                let mut left: Vec<usize> = by_signal[..split_at]
                    .iter()
                    .map(|&v| graph.root_id(v))
                    .collect();
                let mut right: Vec<usize> = by_signal[split_at..]
                    .iter()
                    .map(|&v| graph.root_id(v))
                    .collect();
                left.sort_unstable();
                right.sort_unstable();
                trace!(
                    order,
                    left = left.len(),
                    right = right.len(),
                    "bisection accepted"
                );
                Ok(Bisection::Split {
                    left,
                    right,
                    signal,
                })
            }
            None => Ok(Bisection::NoSplit),
        }
    }

    /// Chooses the prefix length of signal-sorted vertices minimizing the
    /// normalized cut, or `None` when no admissible position exists.
    fn sweep_cut(&self, graph: &SparseGraph, by_signal: &[usize]) -> Option<usize> {
        let order = graph.order();
        let total = graph.total_weight();
        let mut in_left = vec![false; order];
        let mut volume = 0.0;
        let mut cut = 0.0;
        let mut best: Option<(f64, usize)> = None;

        for (position, &v) in by_signal.iter().enumerate() {
            let to_left: f64 = graph
                .neighbors(v)
                .filter(|&(nb, _)| in_left[nb])
                .map(|(_, w)| w)
                .sum();
            cut += graph.degree(v) - 2.0 * to_left;
            volume += graph.degree(v);
            in_left[v] = true;

            let left_size = position + 1;
            let right_size = order - left_size;
            if left_size < self.min_cluster_size || right_size < self.min_cluster_size {
                continue;
            }
            let complement = total - volume;
            if volume <= 0.0 || complement <= 0.0 {
                continue;
            }
            let ncut = cut / volume + cut / complement;
            if best.is_none_or(|(best_ncut, _)| ncut < best_ncut) {
                best = Some((ncut, left_size));
            }
        }

        best.filter(|&(ncut, _)| ncut < MAX_BENEFICIAL_NCUT)
            .map(|(_, size)| size)
    }
}
