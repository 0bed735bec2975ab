//! CLI entry point for the shoal clustering pipeline.
//!
//! Parses arguments with clap, runs the pipeline against the given edge
//! list, renders the hierarchy to stdout and maps failures to a non-zero
//! exit code. Logging is initialized eagerly so all later phases can emit
//! structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use shoal_cli::{
    cli::{Cli, render_tree, run_cli},
    logging,
};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let tree = run_cli(&cli).context("failed to cluster the edge list")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_tree(&tree, &mut writer).context("failed to render the cluster tree")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        error!(error = %err, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
