//! Recursive spectral clustering — the divide phase.
//!
//! Each recursion level decomposes its subgraph into connected components,
//! bisects every component large enough to split, guards the resulting sides
//! against weakly affiliated members, and recurses into the survivors.
//! Vertices that cannot be clustered any further accumulate as the direct
//! members of the node where they fell out; everything else lives in leaf
//! nodes until the postprocessing passes redistribute it.
//!
//! Sibling subgraphs share no mutable state, so both sides of a split (and
//! independent components) are processed through a fork-join; results are
//! joined before the parent node is assembled, which keeps child order and
//! the output tree deterministic.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::affiliation::member_scores;
use crate::graph::{SparseGraph, connected_components};
use crate::settings::ClusteringSettings;
use crate::spectral::{Bisection, SpectralBisector};
use crate::tree::{ClusterTree, NodeId};

/// An error aborting a clustering run.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClusteringError {
    /// The input graph had no vertices.
    #[error("cannot cluster an empty graph")]
    EmptyGraph,
    /// The eigensolver failed to converge and strict convergence is on.
    #[error("eigensolver exceeded {max_iterations} iterations")]
    NonConvergence {
        /// The configured iteration budget.
        max_iterations: usize,
    },
}

impl From<crate::spectral::PowerIterationError> for ClusteringError {
    fn from(error: crate::spectral::PowerIterationError) -> Self {
        match error {
            crate::spectral::PowerIterationError::MaxIterationsExceeded { max_iterations } => {
                Self::NonConvergence { max_iterations }
            }
        }
    }
}

impl ClusteringError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> ClusteringErrorCode {
        match self {
            Self::EmptyGraph => ClusteringErrorCode::EmptyGraph,
            Self::NonConvergence { .. } => ClusteringErrorCode::NonConvergence,
        }
    }
}

/// Machine-readable error codes for [`ClusteringError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClusteringErrorCode {
    /// The input graph had no vertices.
    EmptyGraph,
    /// The eigensolver failed to converge and strict convergence is on.
    NonConvergence,
}

impl ClusteringErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyGraph => "CLUSTERING_EMPTY_GRAPH",
            Self::NonConvergence => "CLUSTERING_NON_CONVERGENCE",
        }
    }
}

/// A finished subtree, produced bottom-up by the fork-join recursion and
/// materialized into the arena once the whole divide phase is done.
#[derive(Debug, Default)]
struct RawCluster {
    members: Vec<usize>,
    children: Vec<RawCluster>,
}

impl RawCluster {
    fn leaf(members: Vec<usize>) -> Self {
        Self {
            members,
            children: Vec::new(),
        }
    }
}

struct DividePhase<'g> {
    root: &'g SparseGraph,
    bisector: SpectralBisector,
    min_cluster_size: usize,
    min_affiliation: f64,
    strict_convergence: bool,
}

/// Runs the divide phase over a built graph.
///
/// # Errors
/// Returns [`ClusteringError::EmptyGraph`] for a graph without vertices and
/// [`ClusteringError::NonConvergence`] when the eigensolver exhausts its
/// budget while `strict_convergence` is enabled; without strict convergence
/// the affected subgraph simply becomes a leaf.
#[instrument(name = "clustering.run", err, skip(graph, settings), fields(order = graph.order()))]
pub fn run(
    graph: &SparseGraph,
    settings: &ClusteringSettings,
) -> Result<ClusterTree, ClusteringError> {
    if graph.order() == 0 {
        return Err(ClusteringError::EmptyGraph);
    }
    let phase = DividePhase {
        root: graph,
        bisector: SpectralBisector::new(settings),
        min_cluster_size: settings.min_cluster_size().get(),
        min_affiliation: settings.min_affiliation(),
        strict_convergence: settings.strict_convergence(),
    };
    let raw = phase.build_node(graph)?;

    let mut tree = ClusterTree::new();
    let root = tree.root();
    attach(&mut tree, root, raw);
    debug_assert!(tree.validate_partition(graph.order()).is_ok());
    debug!(nodes = tree.len(), "divide phase finished");
    Ok(tree)
}

fn attach(tree: &mut ClusterTree, id: NodeId, raw: RawCluster) {
    tree.add_members(id, &raw.members);
    for child in raw.children {
        let child_id = tree.add_child(id, Vec::new());
        attach(tree, child_id, child);
    }
}

impl DividePhase<'_> {
    /// Builds the cluster subtree for a subgraph of arbitrary connectivity.
    fn build_node(&self, graph: &SparseGraph) -> Result<RawCluster, ClusteringError> {
        let mut node = RawCluster::default();
        let components = connected_components(graph);
        if components.len() == 1 {
            self.bisect_into(&mut node, graph)?;
            return Ok(node);
        }

        let mut pending = Vec::new();
        for component in components {
            let root_ids: Vec<usize> = component.iter().map(|&v| graph.root_id(v)).collect();
            if root_ids.len() < self.min_cluster_size {
                node.members.extend(root_ids);
            } else if root_ids.len() == self.min_cluster_size {
                node.children.push(RawCluster::leaf(root_ids));
            } else {
                pending.push(self.root.induced_subgraph(&root_ids));
            }
        }

        let built: Result<Vec<RawCluster>, ClusteringError> = pending
            .par_iter()
            .map(|subgraph| {
                let mut child = RawCluster::default();
                self.bisect_into(&mut child, subgraph)?;
                Ok(child)
            })
            .collect();
        node.children.extend(built?);
        Ok(node)
    }

    /// Bisects a connected subgraph into `node`, either recursing into the
    /// split sides or terminating the node as a leaf.
    fn bisect_into(
        &self,
        node: &mut RawCluster,
        graph: &SparseGraph,
    ) -> Result<(), ClusteringError> {
        let outcome = match self.bisector.bisect(graph) {
            Ok(outcome) => outcome,
            Err(error) => {
                if self.strict_convergence {
                    return Err(error.into());
                }
                warn!(
                    order = graph.order(),
                    code = error.code().as_str(),
                    "eigensolver did not converge, keeping subgraph as a leaf"
                );
                node.members.extend_from_slice(graph.root_ids());
                return Ok(());
            }
        };

        let Bisection::Split { left, right, .. } = outcome else {
            node.members.extend_from_slice(graph.root_ids());
            return Ok(());
        };

        let mut pending = Vec::new();
        for side in [left, right] {
            match self.ensure_affiliation(side, &mut node.members) {
                Some(survivors) if survivors.len() == self.min_cluster_size => {
                    node.children.push(RawCluster::leaf(survivors));
                }
                Some(survivors) => pending.push(self.root.induced_subgraph(&survivors)),
                None => {}
            }
        }

        match pending.len() {
            0 => {}
            1 => node.children.push(self.build_node(&pending[0])?),
            _ => {
                let (first, second) = rayon::join(
                    || self.build_node(&pending[0]),
                    || self.build_node(&pending[1]),
                );
                node.children.push(first?);
                node.children.push(second?);
            }
        }
        Ok(())
    }

    /// Shrinks a split side until every remaining vertex meets the minimum
    /// affiliation, moving rejects into `fallout`. Returns `None` when the
    /// side collapses below the minimum cluster size (all its vertices end
    /// up in `fallout`).
    fn ensure_affiliation(
        &self,
        side: Vec<usize>,
        fallout: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        let mut current = side;
        loop {
            let subgraph = self.root.induced_subgraph(&current);
            let scores = member_scores(self.root, &subgraph);
            let mut keep = Vec::with_capacity(current.len());
            let mut dropped = false;
            for v in 0..subgraph.order() {
                if scores[v] < self.min_affiliation {
                    fallout.push(subgraph.root_id(v));
                    dropped = true;
                } else {
                    keep.push(subgraph.root_id(v));
                }
            }
            if keep.len() < self.min_cluster_size {
                fallout.extend(keep);
                return None;
            }
            if !dropped || keep.len() == self.min_cluster_size {
                return Some(keep);
            }
            current = keep;
        }
    }
}
