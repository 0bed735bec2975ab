//! Shoal core library: recursive spectral clustering of weighted graphs.
//!
//! A weighted undirected graph is recursively bisected along the Fiedler
//! direction of its normalized Laplacian. Each recursion level decomposes
//! its subgraph into connected components, splits every component at the
//! cheapest admissible normalized cut, and shifts weakly affiliated
//! vertices upward, producing a hierarchy of clusters whose members carry
//! affiliation scores. Postprocessing passes then relocate stray members,
//! merge structurally redundant clusters and optionally flatten degenerate
//! chains.
//!
//! The main entry point is [`Shoal`]; graphs are assembled through
//! [`LabeledGraphBuilder`] and configuration through
//! [`ClusteringSettings::builder`].
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod affiliation;
pub mod clustering;
mod digest;
mod graph;
pub mod postprocess;
mod settings;
mod shoal;
mod spectral;
mod tree;

pub use crate::{
    clustering::{ClusteringError, ClusteringErrorCode},
    digest::{Member, OutputCluster},
    graph::{
        GraphError, GraphErrorCode, LabeledGraph, LabeledGraphBuilder, SparseGraph,
        SparseGraphBuilder,
    },
    settings::{
        ClusteringSettings, ClusteringSettingsBuilder, DEFAULT_CONVERGENCE_TOLERANCE,
        DEFAULT_MAX_ITERATIONS, DEFAULT_RANDOM_SEED, SettingsError, SettingsErrorCode,
    },
    shoal::Shoal,
    spectral::{
        Bisection, MAX_BENEFICIAL_NCUT, PowerIterationError, PowerIterationErrorCode,
        SpectralBisector,
    },
    tree::{ClusterTree, NodeId, PartitionError},
};
