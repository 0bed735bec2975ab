//! Clustering pipeline entry point.
//!
//! [`Shoal`] wires the phases together: the recursive divide phase builds
//! the raw cluster tree, the postprocessing passes rewrite it, and the
//! digest maps the result back into label space.

use std::hash::Hash;

use tracing::instrument;

use crate::clustering::{self, ClusteringError};
use crate::digest::{self, OutputCluster};
use crate::graph::LabeledGraph;
use crate::postprocess;
use crate::settings::ClusteringSettings;

/// Runs the full clustering pipeline against a labeled graph.
///
/// # Examples
/// ```
/// use shoal_core::{ClusteringSettings, LabeledGraphBuilder, Shoal};
///
/// let mut builder = LabeledGraphBuilder::new();
/// for &(u, v) in &[("a", "b"), ("b", "c"), ("a", "c"),
///                  ("x", "y"), ("y", "z"), ("x", "z")] {
///     builder.add(u, v, 1.0).expect("valid edge");
/// }
/// let graph = builder.build();
///
/// let settings = ClusteringSettings::builder()
///     .min_cluster_size(3)
///     .build()
///     .expect("configuration is valid");
/// let result = Shoal::new(settings).run(&graph).expect("clustering succeeds");
/// assert_eq!(result.children().len(), 2);
/// assert_eq!(result.aggregate_len(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct Shoal {
    settings: ClusteringSettings,
}

impl Shoal {
    /// Creates a pipeline with the given settings.
    #[must_use]
    pub fn new(settings: ClusteringSettings) -> Self {
        Self { settings }
    }

    /// The settings this pipeline runs with.
    #[must_use]
    pub fn settings(&self) -> &ClusteringSettings {
        &self.settings
    }

    /// Clusters a labeled graph into a hierarchy of scored clusters.
    ///
    /// # Errors
    /// Returns [`ClusteringError::EmptyGraph`] when the graph has no
    /// vertices, and [`ClusteringError::NonConvergence`] when the
    /// eigensolver exhausts its budget while strict convergence is enabled.
    #[instrument(
        name = "shoal.run",
        err,
        skip(self, graph),
        fields(
            order = graph.graph().order(),
            edges = graph.graph().size(),
            min_cluster_size = %self.settings.min_cluster_size(),
        ),
    )]
    pub fn run<L>(&self, graph: &LabeledGraph<L>) -> Result<OutputCluster<L>, ClusteringError>
    where
        L: Eq + Hash + Clone,
    {
        let mut tree = clustering::run(graph.graph(), &self.settings)?;
        postprocess::apply(&mut tree, graph.graph(), &self.settings);
        Ok(digest::digest(&tree, graph))
    }
}
