//! Read-only output shape.
//!
//! The arena tree speaks root-graph vertex ids; the digest maps it into the
//! externally observable result: a tree of clusters whose members carry
//! their label, affiliation score and structural weight. Weights are the
//! member's weighted degree within the cluster's aggregate subgraph;
//! affiliation scores relate that weight to the member's degree in the root
//! graph. Members are ranked by descending weight (ties by vertex id) so
//! output order is deterministic.

use crate::graph::{LabeledGraph, SparseGraph};
use crate::tree::{ClusterTree, NodeId};

/// A scored cluster member.
#[derive(Clone, Debug, PartialEq)]
pub struct Member<L> {
    label: L,
    affiliation: f64,
    weight: f64,
}

impl<L> Member<L> {
    /// The vertex label.
    pub fn label(&self) -> &L {
        &self.label
    }

    /// Affiliation score of the member within its cluster, in `[0, 1]`.
    #[must_use]
    pub fn affiliation(&self) -> f64 {
        self.affiliation
    }

    /// Structural weight: the member's weighted degree within the cluster's
    /// aggregate subgraph.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// A node of the final cluster hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputCluster<L> {
    members: Vec<Member<L>>,
    children: Vec<OutputCluster<L>>,
}

impl<L> OutputCluster<L> {
    /// Direct members of this cluster, ranked by descending weight.
    #[must_use]
    pub fn members(&self) -> &[Member<L>] {
        &self.members
    }

    /// Ordered child clusters.
    #[must_use]
    pub fn children(&self) -> &[OutputCluster<L>] {
        &self.children
    }

    /// Total number of members in this cluster and all its descendants.
    #[must_use]
    pub fn aggregate_len(&self) -> usize {
        self.members.len() + self.children.iter().map(Self::aggregate_len).sum::<usize>()
    }
}

/// Digests a finished cluster tree into the labeled output hierarchy.
pub(crate) fn digest<L: Clone>(tree: &ClusterTree, graph: &LabeledGraph<L>) -> OutputCluster<L> {
    digest_node(tree, tree.root(), graph)
}

fn digest_node<L: Clone>(
    tree: &ClusterTree,
    node: NodeId,
    graph: &LabeledGraph<L>,
) -> OutputCluster<L> {
    let root = graph.graph();
    let aggregate = tree.aggregate_members(node);
    let aggregate_graph = root.induced_subgraph(&aggregate);

    let mut ranked: Vec<(usize, f64, f64)> = tree
        .members(node)
        .iter()
        .map(|&vertex| {
            let weight = aggregate_graph.degree_of_root(vertex);
            let affiliation = relative_weight(root, vertex, weight);
            (vertex, affiliation, weight)
        })
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

    let members = ranked
        .into_iter()
        .map(|(vertex, affiliation, weight)| Member {
            label: graph.label(vertex).clone(),
            affiliation,
            weight,
        })
        .collect();
    let children = tree
        .children(node)
        .iter()
        .map(|&child| digest_node(tree, child, graph))
        .collect();
    OutputCluster { members, children }
}

fn relative_weight(root: &SparseGraph, vertex: usize, aggregate_degree: f64) -> f64 {
    let root_degree = root.degree_of_root(vertex);
    if root_degree > 0.0 {
        aggregate_degree / root_degree
    } else {
        0.0
    }
}
