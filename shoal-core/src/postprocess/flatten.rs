//! Single-child chain flattening.
//!
//! A node with exactly one child and no direct members carries no structure;
//! removing it and promoting the child keeps the tree's information content
//! unchanged. One bottom-up pass suffices: lifting a child can only make
//! nodes *above* the current position eligible, and those are visited later.

use crate::tree::ClusterTree;

/// Runs the flattening pass. Returns whether anything was lifted.
pub(crate) fn flatten(tree: &mut ClusterTree) -> bool {
    let mut changed = false;
    for node in tree.bottom_up() {
        if tree.is_live(node) && tree.lift_only_child(node) {
            changed = true;
        }
    }
    changed
}
