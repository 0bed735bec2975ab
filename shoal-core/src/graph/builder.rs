//! Incremental construction of [`SparseGraph`] instances.
//!
//! The builder accepts an arbitrary number of undirected `(u, v, weight)`
//! triples, not necessarily unique or sorted. Parallel edges are collapsed at
//! build time by summing their weights; self-loops and non-positive weights
//! are rejected immediately so a malformed input never produces a partial
//! graph.

use thiserror::Error;
use tracing::debug;

use super::SparseGraph;

/// An error produced while assembling a graph from edge triples.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// Both endpoints of an edge referred to the same vertex.
    #[error("edge ({vertex}, {vertex}) is a self-loop")]
    SelfLoop {
        /// The offending vertex id.
        vertex: usize,
    },
    /// An edge carried a zero or negative weight.
    #[error("edge ({left}, {right}) has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Left endpoint id.
        left: usize,
        /// Right endpoint id.
        right: usize,
        /// The rejected weight value.
        weight: f64,
    },
    /// An edge carried a NaN or infinite weight.
    #[error("edge ({left}, {right}) has non-finite weight")]
    NonFiniteWeight {
        /// Left endpoint id.
        left: usize,
        /// Right endpoint id.
        right: usize,
    },
}

impl GraphError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> GraphErrorCode {
        match self {
            Self::SelfLoop { .. } => GraphErrorCode::SelfLoop,
            Self::NonPositiveWeight { .. } => GraphErrorCode::NonPositiveWeight,
            Self::NonFiniteWeight { .. } => GraphErrorCode::NonFiniteWeight,
        }
    }
}

/// Machine-readable error codes for [`GraphError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GraphErrorCode {
    /// Both endpoints of an edge referred to the same vertex.
    SelfLoop,
    /// An edge carried a zero or negative weight.
    NonPositiveWeight,
    /// An edge carried a NaN or infinite weight.
    NonFiniteWeight,
}

impl GraphErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfLoop => "GRAPH_SELF_LOOP",
            Self::NonPositiveWeight => "GRAPH_NON_POSITIVE_WEIGHT",
            Self::NonFiniteWeight => "GRAPH_NON_FINITE_WEIGHT",
        }
    }
}

/// Accumulates weighted edge triples and builds an immutable [`SparseGraph`].
///
/// # Examples
/// ```
/// use shoal_core::SparseGraphBuilder;
///
/// let mut builder = SparseGraphBuilder::new();
/// builder.add(0, 1, 1.0).expect("valid edge");
/// builder.add(1, 0, 2.0).expect("valid edge");
/// let graph = builder.build();
/// assert_eq!(graph.order(), 2);
/// assert_eq!(graph.size(), 1);
/// assert_eq!(graph.degree(0), 3.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SparseGraphBuilder {
    edges: Vec<(usize, usize, f64)>,
    max_vertex: Option<usize>,
}

impl SparseGraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an undirected edge.
    ///
    /// # Errors
    /// Returns [`GraphError::SelfLoop`] when `u == v`,
    /// [`GraphError::NonPositiveWeight`] when `weight <= 0` and
    /// [`GraphError::NonFiniteWeight`] when the weight is NaN or infinite.
    pub fn add(&mut self, u: usize, v: usize, weight: f64) -> Result<&mut Self, GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { left: u, right: v });
        }
        if weight <= 0.0 {
            return Err(GraphError::NonPositiveWeight {
                left: u,
                right: v,
                weight,
            });
        }
        if u == v {
            return Err(GraphError::SelfLoop { vertex: u });
        }
        self.edges.push((u, v, weight));
        let hi = u.max(v);
        self.max_vertex = Some(self.max_vertex.map_or(hi, |m| m.max(hi)));
        Ok(self)
    }

    /// Number of edge triples added so far (before parallel-edge collapsing).
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edges have been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Builds the graph, collapsing parallel edges by summing their weights.
    ///
    /// The vertex set is `[0, max_id]`; ids that never appear in an edge
    /// become isolated vertices of degree zero.
    #[must_use]
    pub fn build(self) -> SparseGraph {
        let order = self.max_vertex.map_or(0, |m| m + 1);
        let mut counts = vec![0usize; order];
        for &(u, v, _) in &self.edges {
            counts[u] += 1;
            counts[v] += 1;
        }

        let mut offsets = Vec::with_capacity(order + 1);
        let mut acc = 0usize;
        offsets.push(0);
        for &c in &counts {
            acc += c;
            offsets.push(acc);
        }

        // Scatter both arc directions, then sort each adjacency row and
        // collapse duplicate targets.
        let mut cursor = offsets[..order].to_vec();
        let mut targets = vec![0usize; acc];
        let mut weights = vec![0.0f64; acc];
        for &(u, v, w) in &self.edges {
            targets[cursor[u]] = v;
            weights[cursor[u]] = w;
            cursor[u] += 1;
            targets[cursor[v]] = u;
            weights[cursor[v]] = w;
            cursor[v] += 1;
        }

        let (offsets, targets, weights) = collapse_rows(order, &offsets, &targets, &weights);
        debug!(
            order,
            edges = targets.len() / 2,
            "sparse graph built"
        );
        let to_root = (0..order).collect();
        SparseGraph::from_parts(offsets, targets, weights, to_root)
    }
}

/// Sorts each CSR row by target id and merges duplicate targets by summing
/// their weights.
fn collapse_rows(
    order: usize,
    offsets: &[usize],
    targets: &[usize],
    weights: &[f64],
) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
    let mut out_offsets = Vec::with_capacity(order + 1);
    let mut out_targets = Vec::with_capacity(targets.len());
    let mut out_weights = Vec::with_capacity(weights.len());
    out_offsets.push(0);
    for v in 0..order {
        let mut row: Vec<(usize, f64)> = (offsets[v]..offsets[v + 1])
            .map(|i| (targets[i], weights[i]))
            .collect();
        row.sort_unstable_by_key(|&(t, _)| t);
        for (target, weight) in row {
            match out_targets.last() {
                Some(&last) if last == target && out_targets.len() > out_offsets[v] => {
                    let slot = out_weights.len() - 1;
                    out_weights[slot] += weight;
                }
                _ => {
                    out_targets.push(target);
                    out_weights.push(weight);
                }
            }
        }
        out_offsets.push(out_targets.len());
    }
    (out_offsets, out_targets, out_weights)
}
