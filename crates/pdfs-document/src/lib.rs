// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfs-document — Document processing for pdfs.
//
// Converts raster images into single-page PDFs, normalizes mixed image/PDF
// inputs, joins their pages into one document and rotates pages in place.

pub mod image;
pub mod normalize;
pub mod ops;
pub mod pdf;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the primary entry points so callers can use `pdfs_document::join` etc.
pub use image::converter::ImageConverter;
pub use normalize::Normalizer;
pub use ops::{join, join_with, rotate};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
