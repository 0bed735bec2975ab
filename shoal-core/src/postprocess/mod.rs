//! Structural postprocessing of the raw cluster tree.
//!
//! Three passes run in a fixed order, each only when its setting enables it:
//!
//! 1. relocation — member-level: weakly affiliated members move to the tree
//!    neighborhood node they affiliate with most strongly.
//! 2. merging — cluster-level: children structurally redundant with their
//!    parent are assimilated, lifting the artificial restriction to binary
//!    trees.
//! 3. flattening — removes degenerate single-child chains.
//!
//! All passes are strictly sequential bottom-up traversals: they mutate
//! shared parent/child links and member sets, so no parallelism crosses
//! ancestor/descendant boundaries. Every pass preserves the tree-wide
//! membership partition invariant.

mod flatten;
mod merge;
mod relocate;

pub use self::relocate::MAX_RELOCATION_PASSES;

pub(crate) use self::flatten::flatten;
pub(crate) use self::merge::merge;
pub(crate) use self::relocate::relocate;

use tracing::debug;

use crate::graph::SparseGraph;
use crate::settings::ClusteringSettings;
use crate::tree::ClusterTree;

/// Applies the configured postprocessing passes in order.
pub fn apply(tree: &mut ClusterTree, graph: &SparseGraph, settings: &ClusteringSettings) {
    if let Some(threshold) = settings.min_parent_similarity() {
        let changed = relocate(tree, graph, settings.min_affiliation(), threshold);
        debug!(changed, "relocation finished");
        debug_assert!(tree.validate_partition(graph.order()).is_ok());
    }
    if let Some(threshold) = settings.max_parent_similarity() {
        let changed = merge(tree, graph, threshold);
        debug!(changed, "merging finished");
        debug_assert!(tree.validate_partition(graph.order()).is_ok());
    }
    if settings.flatten() {
        let changed = flatten(tree);
        debug!(changed, "flattening finished");
        debug_assert!(tree.validate_partition(graph.order()).is_ok());
    }
}
