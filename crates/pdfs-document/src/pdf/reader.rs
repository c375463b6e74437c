// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect and rotate existing PDF documents using the
// `lopdf` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use pdfs_core::error::{PdfsError, Result};
use pdfs_core::{PageSelection, Rotation, SourceKind};
use tracing::{debug, info, instrument};

/// Page tree nodes deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 64;

/// Reads and manipulates existing PDF files.
///
/// Wraps `lopdf::Document`. Pages are addressed by zero-based index.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Where the document came from, for diagnostics.
    source: Option<String>,
    /// Whether the document was parsed directly or converted from an image.
    kind: SourceKind,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        debug!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PdfsError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source: Some(path_ref.display().to_string()),
            kind: SourceKind::Pdf,
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_source(data, None, SourceKind::Pdf)
    }

    /// Create a reader from in-memory bytes, remembering their origin.
    #[instrument(skip(data), fields(bytes_len = data.len()))]
    pub fn from_source(data: &[u8], source: Option<String>, kind: SourceKind) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| match &source {
            Some(name) => PdfsError::PdfError(format!("failed to load {}: {}", name, err)),
            None => PdfsError::PdfError(format!("failed to load PDF from memory: {}", err)),
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source,
            kind,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs in document order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        // lopdf keys pages by 1-indexed page number, so the map is already ordered.
        self.document.get_pages().into_values().collect()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Effective clockwise rotation of the page at `index`, including a value
    /// inherited from the page tree. `None` if there is no such page.
    pub fn rotation(&self, index: u32) -> Option<i64> {
        let page_id = *self.document.get_pages().get(&index.checked_add(1)?)?;
        Some(effective_rotation(&self.document, page_id))
    }

    // -- Rotation -------------------------------------------------------------

    /// Rotate every selected page by `rotation`, keeping page order.
    ///
    /// Selected indices past the last page are ignored. Returns the indices
    /// that were rotated.
    #[instrument(skip(self, selection), fields(selected = selection.len(), degrees = rotation.degrees()))]
    pub fn rotate_pages(
        &mut self,
        selection: &PageSelection,
        rotation: Rotation,
    ) -> Result<Vec<u32>> {
        let page_ids = self.page_ids();
        let mut rotated = Vec::new();

        for (index, page_id) in (0u32..).zip(page_ids.iter().copied()) {
            if !selection.contains(index) {
                continue;
            }

            let existing = effective_rotation(&self.document, page_id);
            let new_rotation = rotation.apply(existing);

            let page = self.document.get_dictionary_mut(page_id).map_err(|err| {
                PdfsError::PdfError(format!("page {} is not a dictionary: {}", index, err))
            })?;
            page.set("Rotate", Object::Integer(new_rotation));

            debug!(index, existing, new_rotation, "Page rotated");
            rotated.push(index);
        }

        let page_count = page_ids.len();
        let ignored = selection.count_from(u32::try_from(page_count).unwrap_or(u32::MAX));
        if ignored > 0 {
            debug!(ignored, page_count, "Selected pages past the end were ignored");
        }

        info!(rotated = rotated.len(), page_count, "Rotation applied");
        Ok(rotated)
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the whole document into `writer`.
    pub fn write_to(&mut self, writer: &mut impl Write) -> Result<()> {
        self.document
            .save_to(writer)
            .map_err(|err| PdfsError::PdfError(format!("failed to serialise PDF: {}", err)))
    }

    /// Write the document to `path`, replacing whatever is there.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// -- Page tree helpers --------------------------------------------------------

/// Look up `key` on a page, falling back to its ancestors in the page tree.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Follow indirect references until a direct object is reached.
pub(crate) fn resolve<'a>(doc: &'a Document, mut object: &'a Object) -> Option<&'a Object> {
    for _ in 0..MAX_TREE_DEPTH {
        match object {
            Object::Reference(id) => object = doc.get_object(*id).ok()?,
            direct => return Some(direct),
        }
    }
    None
}

/// The page's `/Rotate`, honouring inheritance; 0 when unset or unreadable.
fn effective_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|value| resolve(doc, value))
        .and_then(|value| match value {
            Object::Integer(degrees) => Some(*degrees),
            Object::Real(degrees) => Some(*degrees as i64),
            _ => None,
        })
        .map(Rotation::normalize)
        .unwrap_or(0)
}
