//! Argument parsing, edge-list ingestion and tree rendering.
//!
//! The input format is one undirected edge per line: `left<TAB>right<TAB>
//! weight`. Blank lines and lines starting with `#` are skipped. Vertex
//! labels are arbitrary strings interned in first-seen order, so re-running
//! on the same file reproduces the same output byte for byte.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::{info, instrument};

use shoal_core::{
    ClusteringError, ClusteringSettings, GraphError, LabeledGraph, LabeledGraphBuilder,
    OutputCluster, SettingsError, Shoal,
};

/// Cluster a weighted edge list into a hierarchy of scored clusters.
#[derive(Debug, Parser)]
#[command(name = "shoal", version, about)]
pub struct Cli {
    /// Path to a TSV edge list; reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Minimum cluster size; splits below it are not attempted.
    #[arg(long, default_value_t = 1)]
    pub min_cluster_size: usize,

    /// Minimum member affiliation score in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    pub min_affiliation: f64,

    /// Enable member relocation with this similarity threshold.
    #[arg(long)]
    pub relocate_similarity: Option<f64>,

    /// Enable parent/child merging with this similarity threshold.
    #[arg(long)]
    pub merge_similarity: Option<f64>,

    /// Collapse single-child chains after merging.
    #[arg(long)]
    pub flatten: bool,

    /// Abort the run when the eigensolver fails to converge.
    #[arg(long)]
    pub strict_convergence: bool,

    /// Seed for the eigensolver's initial vector.
    #[arg(long)]
    pub random_seed: Option<u64>,
}

/// An error surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input failed.
    #[error("failed to read {path}: {source}")]
    Input {
        /// The offending path (`-` for stdin).
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line of the edge list could not be parsed.
    #[error("line {line}: expected `left<TAB>right<TAB>weight`, got `{content}`")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
    /// The edge list contained an invalid edge.
    #[error("line {line}: {source}")]
    Edge {
        /// 1-based line number.
        line: usize,
        /// Underlying graph validation error.
        #[source]
        source: GraphError,
    },
    /// The requested settings are contradictory.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The clustering run itself failed.
    #[error(transparent)]
    Core(#[from] ClusteringError),
}

/// Parses the edge list, runs the pipeline and returns the cluster tree.
///
/// # Errors
/// Returns a [`CliError`] for unreadable input, malformed lines, invalid
/// edges, contradictory settings or a failed clustering run.
#[instrument(name = "cli.run", err, skip(cli))]
pub fn run_cli(cli: &Cli) -> Result<OutputCluster<String>, CliError> {
    let graph = match &cli.input {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Input {
                path: path.display().to_string(),
                source,
            })?;
            read_edge_list(BufReader::new(file))?
        }
        None => read_edge_list(BufReader::new(io::stdin().lock()))?,
    };
    info!(
        order = graph.graph().order(),
        edges = graph.graph().size(),
        "edge list loaded"
    );
    let settings = build_settings(cli)?;
    Ok(Shoal::new(settings).run(&graph)?)
}

fn build_settings(cli: &Cli) -> Result<ClusteringSettings, SettingsError> {
    let mut builder = ClusteringSettings::builder()
        .min_cluster_size(cli.min_cluster_size)
        .min_affiliation(cli.min_affiliation)
        .flatten(cli.flatten)
        .strict_convergence(cli.strict_convergence);
    if let Some(threshold) = cli.relocate_similarity {
        builder = builder.min_parent_similarity(threshold);
    }
    if let Some(threshold) = cli.merge_similarity {
        builder = builder.max_parent_similarity(threshold);
    }
    if let Some(seed) = cli.random_seed {
        builder = builder.random_seed(seed);
    }
    builder.build()
}

/// Reads a TSV edge list into a labeled graph.
///
/// # Errors
/// Returns a [`CliError`] for I/O failures, malformed lines and invalid
/// edges.
pub fn read_edge_list<R: Read>(reader: BufReader<R>) -> Result<LabeledGraph<String>, CliError> {
    let mut builder = LabeledGraphBuilder::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| CliError::Input {
            path: "-".to_owned(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split('\t');
        let (Some(left), Some(right), Some(weight), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(CliError::Malformed {
                line: number,
                content: trimmed.to_owned(),
            });
        };
        let weight: f64 = weight.parse().map_err(|_| CliError::Malformed {
            line: number,
            content: trimmed.to_owned(),
        })?;
        builder
            .add(left.to_owned(), right.to_owned(), weight)
            .map_err(|source| CliError::Edge {
                line: number,
                source,
            })?;
    }
    Ok(builder.build())
}

/// Renders a cluster hierarchy as indented text, two spaces per level,
/// members as `label:affiliation:weight` rounded to five decimals.
///
/// # Errors
/// Propagates writer failures.
pub fn render_tree<W: Write>(cluster: &OutputCluster<String>, writer: &mut W) -> io::Result<()> {
    render_level(cluster, writer, 0)
}

fn render_level<W: Write>(
    cluster: &OutputCluster<String>,
    writer: &mut W,
    depth: usize,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let members: Vec<String> = cluster
        .members()
        .iter()
        .map(|member| {
            format!(
                "{}:{:.5}:{:.5}",
                member.label(),
                member.affiliation(),
                member.weight()
            )
        })
        .collect();
    writeln!(writer, "{indent}[{}]", members.join(", "))?;
    for child in cluster.children() {
        render_level(child, writer, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use rstest::rstest;

    use super::{CliError, read_edge_list};

    #[test]
    fn parses_a_simple_edge_list() {
        let input = "a\tb\t1.0\n# comment\n\nb\tc\t2.5\n";
        let graph = read_edge_list(BufReader::new(input.as_bytes())).expect("input is valid");
        assert_eq!(graph.graph().order(), 3);
        assert_eq!(graph.graph().size(), 2);
        assert_eq!(graph.label(0).as_str(), "a");
    }

    #[rstest]
    #[case("a\tb\n")]
    #[case("a\tb\tc\td\n")]
    #[case("a\tb\tnot-a-number\n")]
    fn rejects_malformed_lines(#[case] input: &str) {
        let err = read_edge_list(BufReader::new(input.as_bytes()))
            .expect_err("malformed input must fail");
        assert!(matches!(err, CliError::Malformed { line: 1, .. }));
    }

    #[test]
    fn reports_invalid_edges_with_line_numbers() {
        let input = "a\tb\t1.0\nc\tc\t1.0\n";
        let err = read_edge_list(BufReader::new(input.as_bytes()))
            .expect_err("self-loop must fail");
        assert!(matches!(err, CliError::Edge { line: 2, .. }));
    }
}
