// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — accumulate pages from any number of source documents into one
// new document and serialise it once at the end.

use std::collections::HashMap;
use std::io::{BufWriter, Write};

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use pdfs_core::Destination;
use pdfs_core::error::{PdfsError, Result};
use tracing::{debug, instrument, warn};

use super::reader::{PdfReader, inherited_attribute};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Header version of a fresh output; raised to the newest appended source.
const BASE_VERSION: &str = "1.5";

/// An output document that pages are appended to in order.
pub struct PdfWriter {
    document: Document,
    /// The root `/Pages` node every appended page hangs from.
    pages_id: ObjectId,
    page_count: u32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Start an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version(BASE_VERSION);

        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => Object::Integer(0),
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            page_count: 0,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Append every page of `reader`, in the reader's page order.
    ///
    /// Objects shared between pages of the same source (fonts, images) are
    /// copied once. Returns the number of pages appended.
    #[instrument(skip_all, fields(source = reader.source().unwrap_or("<memory>")))]
    pub fn append_document(&mut self, reader: &PdfReader) -> Result<usize> {
        let source = reader.document();
        if version_key(&source.version) > version_key(&self.document.version) {
            debug!(from = %self.document.version, to = %source.version, "Raising PDF version");
            self.document.version = source.version.clone();
        }
        let mut importer = ObjectImporter::new(source);

        let page_ids = reader.page_ids();
        for &page_id in &page_ids {
            self.append_page(&mut importer, page_id)?;
        }

        debug!(
            appended = page_ids.len(),
            total = self.page_count,
            "Document appended"
        );
        Ok(page_ids.len())
    }

    /// Copy one page from the importer's source and hang it on the page tree.
    fn append_page(&mut self, importer: &mut ObjectImporter<'_>, page_id: ObjectId) -> Result<()> {
        let source = importer.source;
        let imported_id = importer
            .import_id(&mut self.document, page_id)
            .ok_or_else(|| {
                PdfsError::PdfError(format!("cannot read page object {:?}", page_id))
            })?;

        // Materialise attributes the page used to inherit from its old tree.
        for key in INHERITABLE_KEYS {
            let present = self
                .document
                .get_dictionary(imported_id)
                .map(|page| page.has(key))
                .map_err(|err| {
                    PdfsError::PdfError(format!("page {:?} is not a dictionary: {}", page_id, err))
                })?;
            if present {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page_id, key) {
                let value = importer.import_object(&mut self.document, value);
                if let Ok(page) = self.document.get_dictionary_mut(imported_id) {
                    page.set(key.to_vec(), value);
                }
            }
        }

        if let Ok(page) = self.document.get_dictionary_mut(imported_id) {
            page.set("Type", "Page");
            page.set("Parent", Object::Reference(self.pages_id));
        }

        let pages = self
            .document
            .get_dictionary_mut(self.pages_id)
            .map_err(|err| PdfsError::PdfError(format!("page tree root missing: {}", err)))?;
        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(Object::Reference(imported_id));
        }
        self.page_count += 1;
        pages.set("Count", Object::Integer(i64::from(self.page_count)));

        Ok(())
    }

    /// Serialise the accumulated document into `writer`.
    pub fn write_to(&mut self, writer: &mut impl Write) -> Result<()> {
        self.document.save_to(writer).map_err(|err| {
            PdfsError::PdfError(format!("failed to serialise joined PDF: {}", err))
        })
    }

    /// Serialise the accumulated document into memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write_to(&mut output)?;
        Ok(output)
    }

    /// Write the document to `destination`. The handle is closed before this
    /// returns, whether writing succeeded or not.
    #[instrument(skip_all, fields(destination = %destination.label()))]
    pub fn save(mut self, destination: Destination) -> Result<()> {
        let mut writer = BufWriter::new(destination.open()?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(pages = self.page_count, "Joined PDF written");
        Ok(())
    }
}

/// Copies objects from one source document into a target, remembering what
/// it already copied so shared and cyclic references are resolved once.
struct ObjectImporter<'a> {
    source: &'a Document,
    imported: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectImporter<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            imported: HashMap::new(),
        }
    }

    /// Copy the object behind `id`, returning its ID in `target`. `None` if
    /// the source cannot resolve it.
    fn import_id(&mut self, target: &mut Document, id: ObjectId) -> Option<ObjectId> {
        if let Some(&existing) = self.imported.get(&id) {
            return Some(existing);
        }

        let object = match self.source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                return None;
            }
        };

        // Reserve the ID first so references back to this object terminate.
        let new_id = target.new_object_id();
        self.imported.insert(id, new_id);

        let cloned = self.import_object(target, object);
        target.objects.insert(new_id, cloned);
        Some(new_id)
    }

    /// Deep-copy a direct object, importing everything it references.
    fn import_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => match self.import_id(target, *id) {
                Some(new_id) => Object::Reference(new_id),
                None => Object::Null,
            },
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.import_object(target, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(target, dict)),
            Object::Stream(stream) => {
                let mut cloned = stream.clone();
                cloned.dict = self.import_dictionary(target, &stream.dict);
                Object::Stream(cloned)
            }
            other => other.clone(),
        }
    }

    /// A page-tree node's `/Parent` is skipped: it points into the source
    /// page tree, and the caller re-parents pages onto the target tree.
    /// Any other `/Parent` (annotations, form fields) is copied.
    fn import_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let tree_node = matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Page") | Ok(b"Pages")
        );

        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if tree_node && key == b"Parent" {
                continue;
            }
            let value = self.import_object(target, value);
            new_dict.set(key.clone(), value);
        }
        new_dict
    }
}

/// `"1.7"` as `(1, 7)` for ordering; `None` if the header is unreadable.
fn version_key(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}
