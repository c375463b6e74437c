// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input normalization: every input, image or PDF, comes out as a PdfReader.

use pdfs_core::error::{PdfsError, Result};
use pdfs_core::{FileReference, ImageLayout, SourceKind};
use tracing::{debug, instrument};

use crate::image::ImageConverter;
use crate::pdf::PdfReader;

/// Turns file references into page readers, converting images on the way.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    converter: ImageConverter,
}

impl Normalizer {
    pub fn new(layout: ImageLayout) -> Self {
        Self {
            converter: ImageConverter::new(layout),
        }
    }

    /// Read `reference` and return a reader over its pages.
    ///
    /// Images are tried first. Content that is not an image is parsed as a
    /// PDF; if that fails too, the PDF error is returned.
    #[instrument(skip_all, fields(input = %reference.label()))]
    pub fn normalize(&self, reference: FileReference) -> Result<PdfReader> {
        let label = reference.label();
        let bytes = reference.read_bytes()?;

        match self.converter.convert(&bytes) {
            Ok(pdf_bytes) => {
                debug!("Converted image input to PDF");
                PdfReader::from_source(&pdf_bytes, Some(label), SourceKind::Image)
            }
            Err(PdfsError::NotAnImage) => {
                debug!("Input is not an image, parsing as PDF");
                PdfReader::from_source(&bytes, Some(label), SourceKind::Pdf)
            }
            Err(err) => Err(err),
        }
    }
}
