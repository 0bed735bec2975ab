//! Member relocation.
//!
//! After the divide phase, every direct member of every node is re-examined
//! bottom-up. A member whose affiliation with its node's own member set falls
//! below `min_affiliation` is offered to the node's tree neighborhood — its
//! ancestors, the children of those ancestors, and its own children — and
//! moves to the best-scoring candidate, provided that score strictly exceeds
//! both the relocation threshold and the member's current score. A move is a
//! remove-then-insert, so no vertex ever belongs to two nodes.
//!
//! Processing deepest nodes first means a member shifted upward is
//! re-evaluated against the updated ancestor state later in the same pass,
//! not against stale data. The pass repeats until a fixed point or until
//! [`MAX_RELOCATION_PASSES`] passes have run; a member oscillating between
//! two homes is thereby left at the best-scoring location the final pass
//! chose.

use crate::affiliation::vertex_affiliation;
use crate::graph::SparseGraph;
use crate::tree::{ClusterTree, NodeId};

/// Upper bound on relocation passes; oscillating members settle wherever the
/// final pass put them.
pub const MAX_RELOCATION_PASSES: usize = 8;

/// Runs the relocation pass. Returns whether anything moved.
pub(crate) fn relocate(
    tree: &mut ClusterTree,
    graph: &SparseGraph,
    min_affiliation: f64,
    min_parent_similarity: f64,
) -> bool {
    // Relocation never alters the node structure, only member sets, so the
    // traversal order is stable across passes.
    let order = tree.bottom_up();
    let mut any_changed = false;
    for _ in 0..MAX_RELOCATION_PASSES {
        let mut changed = false;
        for &node in &order {
            changed |= relocate_node_members(
                tree,
                graph,
                node,
                min_affiliation,
                min_parent_similarity,
            );
        }
        if !changed {
            break;
        }
        any_changed = true;
    }
    any_changed
}

fn relocate_node_members(
    tree: &mut ClusterTree,
    graph: &SparseGraph,
    node: NodeId,
    min_affiliation: f64,
    min_parent_similarity: f64,
) -> bool {
    let mut changed = false;
    let snapshot: Vec<usize> = tree.members(node).to_vec();
    for vertex in snapshot {
        // Membership may have shifted while processing earlier vertices.
        let home_score = vertex_affiliation(graph, tree.members(node), vertex);
        if home_score >= min_affiliation {
            continue;
        }
        let Some((best_score, target)) = best_candidate(tree, graph, node, vertex) else {
            continue;
        };
        if best_score > min_parent_similarity && best_score > home_score {
            tree.move_member(node, target, vertex);
            changed = true;
        }
    }
    changed
}

/// Scores the candidate homes of a vertex and returns the best one.
///
/// Candidates are the node's proper ancestors, the children of those
/// ancestors (its siblings and uncles), and the node's own children.
/// Candidate scores use the candidate's direct member set — exactly the
/// home score the vertex would have after the move, so an accepted move
/// never re-triggers against its new home within the same state. Ties go to
/// the lowest node id, which keeps runs deterministic.
fn best_candidate(
    tree: &ClusterTree,
    graph: &SparseGraph,
    node: NodeId,
    vertex: usize,
) -> Option<(f64, NodeId)> {
    let mut candidates = tree.ancestors(node);
    for ancestor in tree.ancestors(node) {
        for &child in tree.children(ancestor) {
            if child != node {
                candidates.push(child);
            }
        }
    }
    candidates.extend_from_slice(tree.children(node));
    candidates.sort_unstable();
    candidates.dedup();

    let mut best: Option<(f64, NodeId)> = None;
    for candidate in candidates {
        let score = vertex_affiliation(graph, tree.members(candidate), vertex);
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, candidate));
        }
    }
    best
}
