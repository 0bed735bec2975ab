//! Parent/child merging.
//!
//! A child whose aggregate graph is structurally redundant with its parent's
//! — similarity above `max_parent_similarity` — is assimilated: its members
//! join the parent's member set and its children become the parent's
//! children. This undoes the "shaving" artifact of binary bisection, where
//! splitting off one thin slice per level fakes more structure than the
//! graph has.
//!
//! Children are decided before their parent (post-order), and rounds repeat
//! until nothing merges: an assimilation re-parents grandchildren, and those
//! must face their new parent before the pass can claim it is done. Each
//! round removes at least one node, so the loop terminates.

use crate::affiliation::parent_child_similarity;
use crate::graph::SparseGraph;
use crate::tree::ClusterTree;

/// Runs the merge pass to a fixed point. Returns whether anything merged.
pub(crate) fn merge(
    tree: &mut ClusterTree,
    graph: &SparseGraph,
    max_parent_similarity: f64,
) -> bool {
    let mut any_changed = false;
    while merge_round(tree, graph, max_parent_similarity) {
        any_changed = true;
    }
    any_changed
}

fn merge_round(tree: &mut ClusterTree, graph: &SparseGraph, max_parent_similarity: f64) -> bool {
    let mut changed = false;
    for node in tree.post_order() {
        if !tree.is_live(node) {
            continue;
        }
        let Some(parent) = tree.parent(node) else {
            continue;
        };
        let child_members = tree.aggregate_members(node);
        let parent_members = tree.aggregate_members(parent);
        let similarity = parent_child_similarity(graph, &parent_members, &child_members);
        if similarity > max_parent_similarity {
            tree.assimilate_child(parent, node);
            changed = true;
        }
    }
    changed
}
