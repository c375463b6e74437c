// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface of the `pdfs` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pdfs_core::{PaperSize, Rotation};

#[derive(Parser, Debug)]
#[command(
    name = "pdfs",
    version,
    about = "Join images and PDFs into a single PDF, and rotate individual pages"
)]
pub struct Cli {
    /// Enable DEBUG-level logs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// JSON configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join images and PDFs, in the order given, into a new PDF.
    Join(JoinArgs),
    /// Rotate pages of a PDF clockwise, rewriting it in place.
    Rotate(RotateArgs),
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    /// The PDF to create; overwritten if it exists.
    #[arg(value_name = "NEWFILE")]
    pub newfile: PathBuf,

    /// Images (JPEG, PNG, ...) and PDFs to join.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Place images on this paper size (a4, a3, a5, letter, legal, tabloid
    /// or WIDTHxHEIGHT in mm) instead of sizing the page to the image.
    #[arg(long, value_name = "SIZE")]
    pub paper: Option<PaperSize>,

    /// Resolution used to size image pages.
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<f32>,
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    /// The PDF to rotate pages of.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Zero-based page numbers: `3`, `0,2` or `1-4`.
    #[arg(value_name = "PAGES", required = true)]
    pub pages: Vec<String>,

    /// Rotate by 90 degrees (the default).
    #[arg(long = "90")]
    pub cw90: bool,

    /// Rotate by 180 degrees.
    #[arg(long = "180")]
    pub cw180: bool,

    /// Rotate by 270 degrees.
    #[arg(long = "270")]
    pub cw270: bool,
}

impl RotateArgs {
    /// `--270` wins over `--180`, which wins over the 90 degree default.
    pub fn rotation(&self) -> Rotation {
        if self.cw270 {
            Rotation::CW_270
        } else if self.cw180 {
            Rotation::CW_180
        } else {
            Rotation::CW_90
        }
    }
}
