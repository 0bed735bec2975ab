//! Spectrally shifted normalized Laplacian operator.
//!
//! For a connected graph with positive degrees, the normalized Laplacian
//! `L = I - D^{-1/2} A D^{-1/2}` has its smallest eigenvalue 0 with known
//! eigenvector `v0[i] = sqrt(degree(i) / total_weight)`. The operator below
//! computes `M x = x + D^{-1/2} A D^{-1/2} x - 2 (v0 . x) v0` on the fly:
//! shifting by the identity moves the spectrum into `[0, 2]` and projecting
//! out `v0` removes the trivial eigenvector, so the eigenvector the power
//! iteration converges to is the one associated with the second-smallest
//! eigenvalue of `L`.

use crate::graph::SparseGraph;

pub(crate) struct ShiftedNormalizedLaplacian<'g> {
    graph: &'g SparseGraph,
    inv_sqrt_degrees: Vec<f64>,
    v0: Vec<f64>,
}

impl<'g> ShiftedNormalizedLaplacian<'g> {
    /// Builds the operator for a connected graph.
    ///
    /// Connectivity implies every degree is positive, which the inversion
    /// below relies on; callers decompose into components first.
    pub(crate) fn new(graph: &'g SparseGraph) -> Self {
        let order = graph.order();
        let norm = graph.total_weight().sqrt();
        let mut inv_sqrt_degrees = Vec::with_capacity(order);
        let mut v0 = Vec::with_capacity(order);
        for v in 0..order {
            let sqrt_degree = graph.degree(v).sqrt();
            debug_assert!(sqrt_degree > 0.0, "bisected graphs must be connected");
            inv_sqrt_degrees.push(1.0 / sqrt_degree);
            v0.push(sqrt_degree / norm);
        }
        Self {
            graph,
            inv_sqrt_degrees,
            v0,
        }
    }

    pub(crate) fn order(&self) -> usize {
        self.graph.order()
    }

    /// Applies the operator to `x`, writing the result into `y`.
    pub(crate) fn apply(&self, x: &[f64], y: &mut [f64]) {
        let order = self.graph.order();
        let mut mu = 0.0;
        for v in 0..order {
            mu += self.v0[v] * x[v];
        }
        mu *= 2.0;
        for v in 0..order {
            let mut acc = 0.0;
            for (nb, w) in self.graph.neighbors(v) {
                acc += w * x[nb] * self.inv_sqrt_degrees[nb];
            }
            y[v] = x[v] + acc * self.inv_sqrt_degrees[v] - mu * self.v0[v];
        }
    }

    /// Rescales a converged eigenvector of the shifted operator back into
    /// the Fiedler direction of the plain normalized Laplacian.
    pub(crate) fn to_fiedler(&self, vec: &[f64]) -> Vec<f64> {
        vec.iter()
            .zip(&self.inv_sqrt_degrees)
            .map(|(&value, &inv)| value * inv)
            .collect()
    }
}
