//! Label-aware graph construction.
//!
//! Callers address vertices by arbitrary hashable labels; the builder interns
//! every label into a dense vertex id in first-seen order and retains the
//! inverse mapping for result reporting.

use std::collections::HashMap;
use std::hash::Hash;

use super::{GraphError, SparseGraph, SparseGraphBuilder};

/// A [`SparseGraph`] together with the labels its vertex ids were interned
/// from.
///
/// # Examples
/// ```
/// use shoal_core::LabeledGraphBuilder;
///
/// let mut builder = LabeledGraphBuilder::new();
/// builder.add("a", "b", 1.0).expect("valid edge");
/// builder.add("b", "c", 2.0).expect("valid edge");
/// let graph = builder.build();
/// assert_eq!(graph.graph().order(), 3);
/// assert_eq!(graph.label(0), &"a");
/// ```
#[derive(Clone, Debug)]
pub struct LabeledGraph<L> {
    graph: SparseGraph,
    labels: Vec<L>,
}

impl<L> LabeledGraph<L> {
    /// The underlying unlabeled graph.
    #[must_use]
    pub fn graph(&self) -> &SparseGraph {
        &self.graph
    }

    /// The label interned for a vertex id.
    #[must_use]
    pub fn label(&self, vertex: usize) -> &L {
        &self.labels[vertex]
    }
}

/// Builds a [`LabeledGraph`] from labeled edge triples.
///
/// Labels are interned in first-seen order, so vertex ids are dense and the
/// same input sequence always produces the same id assignment.
#[derive(Clone, Debug)]
pub struct LabeledGraphBuilder<L> {
    ids: HashMap<L, usize>,
    labels: Vec<L>,
    builder: SparseGraphBuilder,
}

impl<L> Default for LabeledGraphBuilder<L> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            labels: Vec::new(),
            builder: SparseGraphBuilder::new(),
        }
    }
}

impl<L> LabeledGraphBuilder<L>
where
    L: Eq + Hash + Clone,
{
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an undirected edge between two labeled vertices.
    ///
    /// # Errors
    /// Returns the same validation errors as [`SparseGraphBuilder::add`];
    /// equal labels are a self-loop.
    pub fn add(&mut self, left: L, right: L, weight: f64) -> Result<&mut Self, GraphError> {
        let u = self.intern(left);
        let v = self.intern(right);
        self.builder.add(u, v, weight)?;
        Ok(self)
    }

    /// Adds every edge of an iterator, stopping at the first invalid triple.
    ///
    /// # Errors
    /// Returns the first validation error encountered.
    pub fn extend<I>(&mut self, edges: I) -> Result<&mut Self, GraphError>
    where
        I: IntoIterator<Item = (L, L, f64)>,
    {
        for (left, right, weight) in edges {
            self.add(left, right, weight)?;
        }
        Ok(self)
    }

    /// Builds the labeled graph.
    #[must_use]
    pub fn build(self) -> LabeledGraph<L> {
        LabeledGraph {
            graph: self.builder.build(),
            labels: self.labels,
        }
    }

    fn intern(&mut self, label: L) -> usize {
        if let Some(&id) = self.ids.get(&label) {
            return id;
        }
        let id = self.labels.len();
        self.ids.insert(label.clone(), id);
        self.labels.push(label);
        id
    }
}
