// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The two user-facing operations: join inputs into one PDF, and rotate pages
// of an existing PDF in place.

use std::path::Path;

use pdfs_core::error::{PdfsError, Result};
use pdfs_core::{Destination, FileReference, PageSelection, PdfsConfig, Rotation};
use tracing::{info, instrument};

use crate::normalize::Normalizer;
use crate::pdf::{PdfReader, PdfWriter};

/// Join `files` (images or PDFs, in order) into a new PDF at `destination`,
/// using the default configuration.
pub fn join<D, I, F>(destination: D, files: I) -> Result<u32>
where
    D: Into<Destination>,
    I: IntoIterator<Item = F>,
    F: Into<FileReference>,
{
    join_with(destination, files, &PdfsConfig::default())
}

/// Join `files` into a new PDF at `destination`.
///
/// Every input is normalized before anything is written. Pages appear in
/// input order, and within each input in their original order. An empty
/// `files` is rejected with [`PdfsError::NoInputs`] and the destination is
/// left untouched. Returns the number of pages written.
#[instrument(skip_all)]
pub fn join_with<D, I, F>(destination: D, files: I, config: &PdfsConfig) -> Result<u32>
where
    D: Into<Destination>,
    I: IntoIterator<Item = F>,
    F: Into<FileReference>,
{
    let normalizer = Normalizer::new(config.image.clone());
    let readers = files
        .into_iter()
        .map(|file| normalizer.normalize(file.into()))
        .collect::<Result<Vec<_>>>()?;

    if readers.is_empty() {
        return Err(PdfsError::NoInputs);
    }

    let mut writer = PdfWriter::new();
    for reader in &readers {
        writer.append_document(reader)?;
    }

    let destination = destination.into();
    let label = destination.label();
    let pages = writer.page_count();
    writer.save(destination)?;

    info!(
        documents = readers.len(),
        pages,
        destination = %label,
        "Joined PDF"
    );
    Ok(pages)
}

/// Rotate the selected pages of the PDF at `path` clockwise by `rotation`
/// and overwrite the file.
///
/// Unselected pages and page order are untouched; selected indices past the
/// last page are ignored. Returns the indices that were rotated.
#[instrument(skip(path, selection), fields(path = %path.as_ref().display()))]
pub fn rotate(
    path: impl AsRef<Path>,
    selection: &PageSelection,
    rotation: Rotation,
) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let mut reader = PdfReader::open(path)?;
    let rotated = reader.rotate_pages(selection, rotation)?;
    reader.save(path)?;

    info!(rotated = rotated.len(), "Rotated pages of {}", path.display());
    Ok(rotated)
}
