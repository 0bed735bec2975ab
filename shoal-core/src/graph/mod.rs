//! Weighted sparse graph storage.
//!
//! A [`SparseGraph`] is an immutable compressed-sparse-row adjacency built
//! once by [`SparseGraphBuilder`] and never mutated afterwards. Every graph
//! carries a sorted `to_root` translation table so that induced subgraphs —
//! produced at every recursion level of the clustering engine — can map their
//! local vertex ids back to the root graph's id space. For the root graph the
//! table is the identity.

mod builder;
mod components;
mod labeled;
#[cfg(test)]
mod tests;

pub use self::builder::{GraphError, GraphErrorCode, SparseGraphBuilder};
pub(crate) use self::components::connected_components;
pub use self::labeled::{LabeledGraph, LabeledGraphBuilder};

/// An immutable weighted undirected graph in CSR form.
///
/// Vertex ids are dense local indices in `[0, order)`. Each undirected edge
/// is stored as two directed arcs, so `neighbors` is symmetric and the
/// weighted degree of a vertex is the sum of its incident edge weights.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseGraph {
    offsets: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
    to_root: Vec<usize>,
}

impl SparseGraph {
    pub(crate) fn from_parts(
        offsets: Vec<usize>,
        targets: Vec<usize>,
        weights: Vec<f64>,
        to_root: Vec<usize>,
    ) -> Self {
        let order = to_root.len();
        debug_assert_eq!(offsets.len(), order + 1);
        let mut degrees = vec![0.0; order];
        for v in 0..order {
            degrees[v] = weights[offsets[v]..offsets[v + 1]].iter().sum();
        }
        let total_weight = degrees.iter().sum();
        Self {
            offsets,
            targets,
            weights,
            degrees,
            total_weight,
            to_root,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn order(&self) -> usize {
        self.to_root.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn size(&self) -> usize {
        self.targets.len() / 2
    }

    /// Weighted degree of a local vertex.
    #[must_use]
    pub fn degree(&self, v: usize) -> f64 {
        self.degrees[v]
    }

    /// Sum of all weighted degrees (twice the total edge weight).
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Iterates over `(neighbor, weight)` pairs incident to a local vertex.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.offsets[v]..self.offsets[v + 1];
        self.targets[span.clone()]
            .iter()
            .copied()
            .zip(self.weights[span].iter().copied())
    }

    /// Translates a local vertex id into the root graph's id space.
    #[must_use]
    pub fn root_id(&self, v: usize) -> usize {
        self.to_root[v]
    }

    /// Translates a root-graph vertex id into this graph's local id space.
    ///
    /// Returns `None` when the vertex is not part of this graph.
    #[must_use]
    pub fn local_id(&self, root_id: usize) -> Option<usize> {
        self.to_root.binary_search(&root_id).ok()
    }

    /// Weighted degree looked up by root-graph id, `0.0` for absent vertices.
    #[must_use]
    pub fn degree_of_root(&self, root_id: usize) -> f64 {
        self.local_id(root_id).map_or(0.0, |v| self.degrees[v])
    }

    /// All vertices of this graph as sorted root-graph ids.
    #[must_use]
    pub fn root_ids(&self) -> &[usize] {
        &self.to_root
    }

    /// Builds the induced subgraph over the given root-graph vertex ids.
    ///
    /// Ids are deduplicated and ids absent from this graph are ignored. The
    /// subgraph's local ids are assigned in ascending root-id order and its
    /// translation table composes with this graph's, so the result always
    /// maps back to the root id space no matter how deeply subgraphs nest.
    #[must_use]
    pub fn induced_subgraph(&self, root_ids: &[usize]) -> Self {
        let mut members: Vec<usize> = root_ids
            .iter()
            .copied()
            .filter(|&r| self.local_id(r).is_some())
            .collect();
        members.sort_unstable();
        members.dedup();

        let mut offsets = Vec::with_capacity(members.len() + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();
        offsets.push(0);
        for &root in &members {
            let local = match self.local_id(root) {
                Some(local) => local,
                None => continue,
            };
            for (nb, w) in self.neighbors(local) {
                let nb_root = self.to_root[nb];
                if let Ok(sub_local) = members.binary_search(&nb_root) {
                    targets.push(sub_local);
                    weights.push(w);
                }
            }
            offsets.push(targets.len());
        }
        Self::from_parts(offsets, targets, weights, members)
    }
}
