// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfs — join images and PDFs, rotate PDF pages.
//
// Entry point. Initialises logging, loads configuration and forwards to the
// join or rotate operation.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use pdfs_core::{PageSelection, PdfsConfig};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, JoinArgs, RotateArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PdfsConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => PdfsConfig::default(),
    };

    match cli.command {
        Command::Join(args) => run_join(args, config),
        Command::Rotate(args) => run_rotate(args),
    }
}

fn run_join(args: JoinArgs, mut config: PdfsConfig) -> Result<()> {
    if let Some(paper) = args.paper {
        config.image.paper_size = Some(paper);
    }
    if let Some(dpi) = args.dpi {
        config.image.dpi = dpi;
    }

    pdfs_document::join_with(&args.newfile, &args.files, &config)
        .with_context(|| format!("failed to join into {}", args.newfile.display()))?;
    Ok(())
}

fn run_rotate(args: RotateArgs) -> Result<()> {
    let selection = PageSelection::parse(&args.pages).context("invalid page selection")?;

    pdfs_document::rotate(&args.file, &selection, args.rotation())
        .with_context(|| format!("failed to rotate pages of {}", args.file.display()))?;
    Ok(())
}
