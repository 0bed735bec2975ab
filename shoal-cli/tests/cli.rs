//! End-to-end CLI tests over a temporary edge-list file.

use std::io::Write;

use shoal_cli::cli::{Cli, CliError, render_tree, run_cli};

fn write_edges(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write edges");
    file.flush().expect("flush edges");
    file
}

fn base_cli(input: &tempfile::NamedTempFile) -> Cli {
    Cli {
        input: Some(input.path().to_path_buf()),
        min_cluster_size: 1,
        min_affiliation: 0.0,
        relocate_similarity: None,
        merge_similarity: None,
        flatten: false,
        strict_convergence: false,
        random_seed: None,
    }
}

#[test]
fn clusters_two_triangles_from_a_file() {
    let file = write_edges(
        "a0\ta1\t1.0\na1\ta2\t1.0\na0\ta2\t1.0\nb0\tb1\t1.0\nb1\tb2\t1.0\nb0\tb2\t1.0\n",
    );
    let tree = run_cli(&base_cli(&file)).expect("clustering succeeds");
    assert!(tree.members().is_empty());
    assert_eq!(tree.children().len(), 2);

    let mut rendered = Vec::new();
    render_tree(&tree, &mut rendered).expect("rendering succeeds");
    let rendered = String::from_utf8(rendered).expect("utf8 output");
    assert!(rendered.starts_with("[]\n"));
    assert!(rendered.contains("  [a0:1.00000:2.00000"));
    assert!(rendered.contains("  [b0:1.00000:2.00000"));
}

#[test]
fn rendering_is_reproducible() {
    let file = write_edges(
        "a0\ta1\t1.0\na1\ta2\t1.0\na0\ta2\t1.0\nb0\tb1\t1.0\nb1\tb2\t1.0\nb0\tb2\t1.0\n",
    );
    let first = run_cli(&base_cli(&file)).expect("clustering succeeds");
    let second = run_cli(&base_cli(&file)).expect("clustering succeeds");
    assert_eq!(first, second);
}

#[test]
fn missing_files_are_reported() {
    let file = write_edges("a\tb\t1.0\n");
    let mut cli = base_cli(&file);
    cli.input = Some(std::path::PathBuf::from("/nonexistent/edges.tsv"));
    let err = run_cli(&cli).expect_err("missing file must fail");
    assert!(matches!(err, CliError::Input { .. }));
}

#[test]
fn contradictory_thresholds_are_rejected() {
    let file = write_edges("a\tb\t1.0\n");
    let mut cli = base_cli(&file);
    cli.relocate_similarity = Some(0.8);
    cli.merge_similarity = Some(0.2);
    let err = run_cli(&cli).expect_err("contradictory thresholds must fail");
    assert!(matches!(err, CliError::Settings(_)));
}

#[test]
fn empty_edge_lists_are_rejected() {
    let file = write_edges("# nothing but comments\n");
    let err = run_cli(&base_cli(&file)).expect_err("empty graph must fail");
    assert!(matches!(err, CliError::Core(_)));
}
