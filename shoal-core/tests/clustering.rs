//! End-to-end clustering scenarios.

use shoal_core::{
    ClusteringError, ClusteringSettings, LabeledGraph, LabeledGraphBuilder, OutputCluster, Shoal,
    clustering, postprocess,
};

fn two_triangles() -> LabeledGraph<&'static str> {
    let mut builder = LabeledGraphBuilder::new();
    for &(u, v) in &[
        ("a0", "a1"),
        ("a1", "a2"),
        ("a0", "a2"),
        ("b0", "b1"),
        ("b1", "b2"),
        ("b0", "b2"),
    ] {
        builder.add(u, v, 1.0).expect("valid edge");
    }
    builder.build()
}

/// Two triangles plus a bridge vertex attached to both, more strongly to
/// the first.
fn bridged_triangles() -> LabeledGraph<&'static str> {
    let mut builder = LabeledGraphBuilder::new();
    for &(u, v) in &[
        ("a0", "a1"),
        ("a1", "a2"),
        ("a0", "a2"),
        ("b0", "b1"),
        ("b1", "b2"),
        ("b0", "b2"),
    ] {
        builder.add(u, v, 1.0).expect("valid edge");
    }
    builder.add("bridge", "a0", 0.5).expect("valid edge");
    builder.add("bridge", "b0", 0.25).expect("valid edge");
    builder.build()
}

fn path_graph(n: usize) -> LabeledGraph<usize> {
    let mut builder = LabeledGraphBuilder::new();
    for v in 1..n {
        builder.add(v - 1, v, 1.0).expect("valid edge");
    }
    builder.build()
}

fn member_labels<L: Clone + Ord>(cluster: &OutputCluster<L>) -> Vec<L> {
    let mut labels: Vec<L> = cluster
        .members()
        .iter()
        .map(|m| m.label().clone())
        .collect();
    labels.sort();
    labels
}

fn settings() -> shoal_core::ClusteringSettingsBuilder {
    ClusteringSettings::builder()
}

#[test]
fn disjoint_triangles_become_two_maximal_leaves() {
    let graph = two_triangles();
    let result = Shoal::new(settings().build().expect("valid settings"))
        .run(&graph)
        .expect("clustering succeeds");

    assert!(result.members().is_empty());
    assert_eq!(result.children().len(), 2);
    for child in result.children() {
        assert!(child.children().is_empty());
        assert_eq!(child.members().len(), 3);
        for member in child.members() {
            assert_eq!(member.affiliation(), 1.0);
            assert_eq!(member.weight(), 2.0);
        }
    }
    let sides: Vec<Vec<&str>> = result.children().iter().map(member_labels).collect();
    assert!(sides.contains(&vec!["a0", "a1", "a2"]));
    assert!(sides.contains(&vec!["b0", "b1", "b2"]));
}

#[test]
fn single_edge_with_min_size_two_is_one_leaf() {
    let mut builder = LabeledGraphBuilder::new();
    builder.add("u", "v", 1.0).expect("valid edge");
    let graph = builder.build();

    let result = Shoal::new(
        settings()
            .min_cluster_size(2)
            .build()
            .expect("valid settings"),
    )
    .run(&graph)
    .expect("clustering succeeds");

    assert!(result.children().is_empty());
    assert_eq!(member_labels(&result), vec!["u", "v"]);
}

#[test]
fn star_collapses_to_a_single_root_leaf() {
    let mut builder = LabeledGraphBuilder::new();
    for leaf in ["l1", "l2", "l3", "l4", "l5"] {
        builder.add("hub", leaf, 1.0).expect("valid edge");
    }
    let graph = builder.build();

    let result = Shoal::new(
        settings()
            .max_parent_similarity(0.01)
            .build()
            .expect("valid settings"),
    )
    .run(&graph)
    .expect("clustering succeeds");

    assert!(result.children().is_empty());
    assert_eq!(result.members().len(), 6);
    // The hub dominates the weight ranking.
    assert_eq!(result.members()[0].label(), &"hub");
}

#[test]
fn bridge_vertex_relocates_to_its_stronger_side() {
    let graph = bridged_triangles();

    // A high affiliation bar expels the bridge vertex during the divide
    // phase; relocation then parks it at the side it affiliates with most.
    let relocated = Shoal::new(
        settings()
            .min_cluster_size(3)
            .min_affiliation(0.7)
            .min_parent_similarity(0.3)
            .build()
            .expect("valid settings"),
    )
    .run(&graph)
    .expect("clustering succeeds");

    assert!(relocated.members().is_empty());
    let sides: Vec<Vec<&str>> = relocated.children().iter().map(member_labels).collect();
    assert!(sides.contains(&vec!["a0", "a1", "a2", "bridge"]));
    assert!(sides.contains(&vec!["b0", "b1", "b2"]));

    // Without relocation the expelled vertex stays at the root.
    let stranded = Shoal::new(
        settings()
            .min_cluster_size(3)
            .min_affiliation(0.7)
            .build()
            .expect("valid settings"),
    )
    .run(&graph)
    .expect("clustering succeeds");
    assert_eq!(member_labels(&stranded), vec!["bridge"]);

    // Dropping the bar back to zero keeps the vertex in its side from the
    // start; nothing is left for relocation to do.
    let untouched = Shoal::new(
        settings()
            .min_cluster_size(3)
            .min_parent_similarity(0.3)
            .build()
            .expect("valid settings"),
    )
    .run(&graph)
    .expect("clustering succeeds");
    assert!(untouched.members().is_empty());
    let sides: Vec<Vec<&str>> = untouched.children().iter().map(member_labels).collect();
    assert!(sides.contains(&vec!["a0", "a1", "a2", "bridge"]));
}

#[test]
fn leaf_count_is_monotone_in_min_cluster_size() {
    let graph = path_graph(8);
    let mut previous = usize::MAX;
    for min_cluster_size in 1..=5 {
        let tree = clustering::run(
            graph.graph(),
            &settings()
                .min_cluster_size(min_cluster_size)
                .build()
                .expect("valid settings"),
        )
        .expect("clustering succeeds");
        let leaves = tree
            .pre_order()
            .iter()
            .filter(|&&id| tree.children(id).is_empty())
            .count();
        assert!(
            leaves <= previous,
            "leaf count rose from {previous} to {leaves} at min_cluster_size {min_cluster_size}"
        );
        previous = leaves;
    }
}

#[test]
fn identical_runs_produce_identical_trees() {
    let graph = bridged_triangles();
    let config = settings()
        .min_cluster_size(3)
        .min_affiliation(0.7)
        .min_parent_similarity(0.3)
        .max_parent_similarity(0.9)
        .flatten(true)
        .build()
        .expect("valid settings");
    let first = Shoal::new(config.clone()).run(&graph).expect("run succeeds");
    let second = Shoal::new(config).run(&graph).expect("run succeeds");
    assert_eq!(first, second);
}

#[test]
fn empty_graph_is_rejected_before_clustering() {
    let graph: LabeledGraph<&str> = LabeledGraphBuilder::new().build();
    let err = Shoal::new(settings().build().expect("valid settings"))
        .run(&graph)
        .expect_err("empty graph must fail");
    assert_eq!(err, ClusteringError::EmptyGraph);
    assert_eq!(err.code().as_str(), "CLUSTERING_EMPTY_GRAPH");
}

#[test]
fn strict_convergence_escalates_eigensolver_failures() {
    let mut builder = LabeledGraphBuilder::new();
    for &(u, v) in &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")] {
        builder.add(u, v, 1.0).expect("valid edge");
    }
    let connected = builder.build();

    let strict = settings()
        .max_iterations(1)
        .convergence_tolerance(1e-15)
        .strict_convergence(true)
        .build()
        .expect("valid settings");
    let err = Shoal::new(strict)
        .run(&connected)
        .expect_err("one iteration cannot converge");
    assert!(matches!(err, ClusteringError::NonConvergence { max_iterations: 1 }));

    // Without strict mode the same failure degrades the node to a leaf.
    let lenient = settings()
        .max_iterations(1)
        .convergence_tolerance(1e-15)
        .build()
        .expect("valid settings");
    let result = Shoal::new(lenient)
        .run(&connected)
        .expect("lenient run succeeds");
    assert!(result.children().is_empty());
    assert_eq!(result.members().len(), 4);
}

#[test]
fn flattening_collapses_degenerate_chains_end_to_end() {
    let graph = bridged_triangles();
    let config = settings()
        .min_cluster_size(3)
        .max_parent_similarity(0.9)
        .flatten(true)
        .build()
        .expect("valid settings");
    let tree = {
        let mut tree = clustering::run(graph.graph(), &config).expect("run succeeds");
        postprocess::apply(&mut tree, graph.graph(), &config);
        tree
    };
    for id in tree.pre_order() {
        let single_empty_chain = tree.children(id).len() == 1 && tree.members(id).is_empty();
        assert!(!single_empty_chain, "flattened tree retains a chain node");
    }
    tree.validate_partition(graph.graph().order())
        .expect("partition preserved");
}
