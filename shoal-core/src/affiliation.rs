//! Member affiliation and cluster similarity scoring.
//!
//! Both scores are pure functions of the current member sets and the root
//! graph, so they can be recomputed after every structural rewrite without
//! hidden state.
//!
//! - The affiliation of a vertex with respect to a member set is the fraction
//!   of its root-graph weighted degree that points into that set. It lies in
//!   `[0, 1]` and grows with how much of the vertex's connectivity the set
//!   captures.
//! - The similarity between a cluster and one of its subclusters is half the
//!   normalized cut between the subcluster and its complement within the
//!   cluster, in `[0, 1]`. High values mean the two are structurally
//!   redundant and the subcluster is a merge candidate.

use crate::graph::SparseGraph;

/// Affiliation scores for every vertex of a subgraph, indexed by the
/// subgraph's local ids.
///
/// Each score is the vertex's weighted degree inside the subgraph divided by
/// its weighted degree in the root graph.
#[must_use]
pub fn member_scores(root: &SparseGraph, subgraph: &SparseGraph) -> Vec<f64> {
    (0..subgraph.order())
        .map(|v| {
            let root_degree = root.degree_of_root(subgraph.root_id(v));
            if root_degree > 0.0 {
                subgraph.degree(v) / root_degree
            } else {
                0.0
            }
        })
        .collect()
}

/// Affiliation of a single vertex with respect to an arbitrary member set.
///
/// `members` must be sorted root-graph ids; the vertex itself is ignored if
/// present, so the score of a vertex against its own singleton set is zero.
#[must_use]
pub fn vertex_affiliation(root: &SparseGraph, members: &[usize], vertex: usize) -> f64 {
    let root_degree = root.degree_of_root(vertex);
    if root_degree <= 0.0 {
        return 0.0;
    }
    let Some(local) = root.local_id(vertex) else {
        return 0.0;
    };
    let into_set: f64 = root
        .neighbors(local)
        .filter(|&(nb, _)| {
            let nb_root = root.root_id(nb);
            nb_root != vertex && members.binary_search(&nb_root).is_ok()
        })
        .map(|(_, w)| w)
        .sum();
    into_set / root_degree
}

/// Similarity between a cluster and one of its subclusters.
///
/// `parent_members` and `child_members` are sorted root-graph ids with the
/// child a subset of the parent. Returns half the normalized cut of the
/// child within the parent's induced subgraph; degenerate volumes fall back
/// to the single defined ratio, an empty side yields zero.
#[must_use]
pub fn parent_child_similarity(
    root: &SparseGraph,
    parent_members: &[usize],
    child_members: &[usize],
) -> f64 {
    if parent_members.is_empty() || child_members.is_empty() {
        return 0.0;
    }
    let parent = root.induced_subgraph(parent_members);

    let mut child_volume = 0.0;
    let mut complement_volume = 0.0;
    let mut cut = 0.0;
    for v in 0..parent.order() {
        let v_in_child = child_members.binary_search(&parent.root_id(v)).is_ok();
        for (nb, w) in parent.neighbors(v) {
            let nb_in_child = child_members.binary_search(&parent.root_id(nb)).is_ok();
            match (v_in_child, nb_in_child) {
                (true, true) => child_volume += w,
                (false, false) => complement_volume += w,
                _ => {
                    child_volume += w;
                    complement_volume += w;
                    cut += w;
                }
            }
        }
    }

    let ncut = if child_volume > 0.0 && complement_volume > 0.0 {
        cut / child_volume + cut / complement_volume
    } else if child_volume > 0.0 {
        cut / child_volume
    } else if complement_volume > 0.0 {
        cut / complement_volume
    } else {
        0.0
    };
    ncut / 2.0
}
