// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pdfs.

use thiserror::Error;

/// Top-level error type for all pdfs operations.
#[derive(Debug, Error)]
pub enum PdfsError {
    // -- Input normalization --
    /// The bytes carry no recognised raster image signature. The normalizer
    /// treats this as "parse it as a PDF instead" and never surfaces it.
    #[error("input is not a recognised image format")]
    NotAnImage,

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Arguments --
    #[error("invalid page index: {0}")]
    InvalidPageIndex(String),

    #[error("rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i32),

    #[error("unknown paper size: {0}")]
    UnknownPaperSize(String),

    #[error("no input files to join")]
    NoInputs,

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfsError>;
