//! Unit tests for graph construction, subgraph extraction and components.

use rstest::rstest;

use super::{GraphError, GraphErrorCode, LabeledGraphBuilder, SparseGraphBuilder};
use crate::graph::connected_components;

fn triangle_with_tail() -> super::SparseGraph {
    // 0-1-2 triangle, 2-3 tail
    let mut builder = SparseGraphBuilder::new();
    builder.add(0, 1, 1.0).expect("valid edge");
    builder.add(1, 2, 1.0).expect("valid edge");
    builder.add(0, 2, 1.0).expect("valid edge");
    builder.add(2, 3, 0.5).expect("valid edge");
    builder.build()
}

#[test]
fn builds_symmetric_adjacency() {
    let graph = triangle_with_tail();
    assert_eq!(graph.order(), 4);
    assert_eq!(graph.size(), 4);
    assert_eq!(graph.degree(0), 2.0);
    assert_eq!(graph.degree(2), 2.5);
    assert_eq!(graph.degree(3), 0.5);
    assert_eq!(graph.total_weight(), 7.0);

    let from_two: Vec<(usize, f64)> = graph.neighbors(2).collect();
    assert_eq!(from_two, vec![(0, 1.0), (1, 1.0), (3, 0.5)]);
}

#[test]
fn sums_parallel_edges() {
    let mut builder = SparseGraphBuilder::new();
    builder.add(0, 1, 1.0).expect("valid edge");
    builder.add(1, 0, 2.5).expect("valid edge");
    let graph = builder.build();
    assert_eq!(graph.size(), 1);
    assert_eq!(graph.degree(0), 3.5);
    assert_eq!(graph.degree(1), 3.5);
}

#[rstest]
#[case(3, 3, 1.0)]
fn rejects_self_loops(#[case] u: usize, #[case] v: usize, #[case] weight: f64) {
    let mut builder = SparseGraphBuilder::new();
    let err = builder.add(u, v, weight).expect_err("self-loop must fail");
    assert_eq!(err, GraphError::SelfLoop { vertex: u });
    assert_eq!(err.code(), GraphErrorCode::SelfLoop);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
fn rejects_non_positive_weights(#[case] weight: f64) {
    let mut builder = SparseGraphBuilder::new();
    let err = builder.add(0, 1, weight).expect_err("weight must fail");
    assert!(matches!(err, GraphError::NonPositiveWeight { .. }));
    assert_eq!(err.code().as_str(), "GRAPH_NON_POSITIVE_WEIGHT");
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rejects_non_finite_weights(#[case] weight: f64) {
    let mut builder = SparseGraphBuilder::new();
    let err = builder.add(0, 1, weight).expect_err("weight must fail");
    assert_eq!(err, GraphError::NonFiniteWeight { left: 0, right: 1 });
}

#[test]
fn empty_builder_yields_empty_graph() {
    let graph = SparseGraphBuilder::new().build();
    assert_eq!(graph.order(), 0);
    assert_eq!(graph.size(), 0);
}

#[test]
fn induced_subgraph_renumbers_and_maps_back() {
    let graph = triangle_with_tail();
    let sub = graph.induced_subgraph(&[3, 1, 2]);
    assert_eq!(sub.order(), 3);
    assert_eq!(sub.root_ids(), &[1, 2, 3]);
    // Edge 0-1 and 0-2 are gone; 1-2 and 2-3 survive.
    assert_eq!(sub.size(), 2);
    assert_eq!(sub.degree(0), 1.0);
    assert_eq!(sub.degree(1), 1.5);
    assert_eq!(sub.root_id(2), 3);
    assert_eq!(sub.local_id(3), Some(2));
    assert_eq!(sub.local_id(0), None);
}

#[test]
fn induced_subgraph_composes_to_root_ids() {
    let graph = triangle_with_tail();
    let sub = graph.induced_subgraph(&[0, 1, 2]);
    let subsub = sub.induced_subgraph(&[1, 2]);
    assert_eq!(subsub.root_ids(), &[1, 2]);
    assert_eq!(subsub.size(), 1);
    assert_eq!(subsub.degree_of_root(1), 1.0);
}

#[test]
fn induced_subgraph_ignores_foreign_ids() {
    let graph = triangle_with_tail();
    let sub = graph.induced_subgraph(&[2, 3, 99]);
    assert_eq!(sub.root_ids(), &[2, 3]);
    assert_eq!(sub.size(), 1);
}

#[test]
fn components_of_disjoint_triangles() {
    let mut builder = SparseGraphBuilder::new();
    for &(u, v) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
        builder.add(u, v, 1.0).expect("valid edge");
    }
    let graph = builder.build();
    let components = connected_components(&graph);
    assert_eq!(components, vec![vec![0, 1, 2], vec![3, 4, 5]]);
}

#[test]
fn components_include_isolated_vertices() {
    let mut builder = SparseGraphBuilder::new();
    builder.add(0, 2, 1.0).expect("valid edge");
    let graph = builder.build();
    let components = connected_components(&graph);
    assert_eq!(components, vec![vec![0, 2], vec![1]]);
}

#[test]
fn labeled_builder_interns_in_first_seen_order() {
    let mut builder = LabeledGraphBuilder::new();
    builder.add("b", "a", 1.0).expect("valid edge");
    builder.add("a", "c", 1.0).expect("valid edge");
    let graph = builder.build();
    assert_eq!(graph.label(0), &"b");
    assert_eq!(graph.label(1), &"a");
    assert_eq!(graph.label(2), &"c");
    assert_eq!(graph.graph().order(), 3);
}

#[test]
fn labeled_builder_rejects_equal_labels() {
    let mut builder = LabeledGraphBuilder::new();
    let err = builder.add("x", "x", 1.0).expect_err("self-loop must fail");
    assert!(matches!(err, GraphError::SelfLoop { .. }));
}
