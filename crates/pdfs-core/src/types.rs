// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: input/output locators, page selections, rotations and
// paper sizes.

use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PdfsError, Result};

// -- Input locators -----------------------------------------------------------

/// Something a document can be read from.
///
/// Paths (textual or `Path`-like), open streams, in-memory buffers and raw
/// descriptors are all accepted. Each variant is resolved to bytes exactly
/// once, by [`FileReference::read_bytes`].
pub enum FileReference {
    /// A filesystem path, opened when the reference is read.
    Path(PathBuf),
    /// An already-open readable stream.
    Reader(Box<dyn Read>),
    /// Document bytes already in memory.
    Bytes(Vec<u8>),
    /// An open file descriptor; ownership passes to the reference.
    #[cfg(unix)]
    Descriptor(std::os::fd::OwnedFd),
}

impl FileReference {
    /// Wrap any readable stream.
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Human-readable name used in logs and error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Reader(_) => "<stream>".to_string(),
            Self::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
            #[cfg(unix)]
            Self::Descriptor(fd) => {
                use std::os::fd::AsRawFd;
                format!("<fd {}>", fd.as_raw_fd())
            }
        }
    }

    /// Read the whole referenced content. Any handle opened here is closed
    /// before returning, on success and on failure.
    pub fn read_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Self::Bytes(bytes) => Ok(bytes),
            #[cfg(unix)]
            Self::Descriptor(fd) => {
                let mut file = File::from(fd);
                let mut buffer = Vec::new();
                file.read_to_end(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

impl fmt::Debug for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileReference").field(&self.label()).finish()
    }
}

impl From<PathBuf> for FileReference {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileReference {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for FileReference {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

impl From<&str> for FileReference {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for FileReference {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<File> for FileReference {
    fn from(file: File) -> Self {
        Self::reader(file)
    }
}

impl From<Vec<u8>> for FileReference {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

#[cfg(unix)]
impl From<std::os::fd::OwnedFd> for FileReference {
    fn from(fd: std::os::fd::OwnedFd) -> Self {
        Self::Descriptor(fd)
    }
}

// -- Output locators ----------------------------------------------------------

/// Where a finished document is written.
pub enum Destination {
    /// Created, or truncated if it exists.
    Path(PathBuf),
    /// Any writable stream.
    Writer(Box<dyn Write>),
    /// An open file descriptor; ownership passes to the destination.
    #[cfg(unix)]
    Descriptor(std::os::fd::OwnedFd),
}

impl Destination {
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Writer(_) => "<stream>".to_string(),
            #[cfg(unix)]
            Self::Descriptor(fd) => {
                use std::os::fd::AsRawFd;
                format!("<fd {}>", fd.as_raw_fd())
            }
        }
    }

    /// Open the destination for writing.
    pub fn open(self) -> Result<Box<dyn Write>> {
        match self {
            Self::Path(path) => Ok(Box::new(File::create(path)?)),
            Self::Writer(writer) => Ok(writer),
            #[cfg(unix)]
            Self::Descriptor(fd) => Ok(Box::new(File::from(fd))),
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Destination").field(&self.label()).finish()
    }
}

impl From<PathBuf> for Destination {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Destination {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for Destination {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

impl From<&str> for Destination {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for Destination {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<File> for Destination {
    fn from(file: File) -> Self {
        Self::Writer(Box::new(file))
    }
}

#[cfg(unix)]
impl From<std::os::fd::OwnedFd> for Destination {
    fn from(fd: std::os::fd::OwnedFd) -> Self {
        Self::Descriptor(fd)
    }
}

/// What the normalizer decided an input was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Parsed directly as a PDF.
    Pdf,
    /// Converted from a raster image into a single PDF page.
    Image,
}

// -- Page selection -----------------------------------------------------------

/// A set of zero-based page indices.
///
/// Built from integers via [`FromIterator`] or from decimal strings via
/// [`PageSelection::parse`]; both forms end up as the same integers, so
/// `0` and `"0"` select the same page. Stored as sorted, disjoint,
/// non-adjacent inclusive ranges, so `0-4294967295` costs one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSelection(Vec<RangeInclusive<u32>>);

impl PageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse textual page tokens.
    ///
    /// Each token is a single index (`"3"`), an inclusive range (`"1-4"`) or
    /// a comma separated list of either (`"0,2,5-6"`).
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();

        for token in tokens {
            for part in token.as_ref().split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }

                if let Some((start, end)) = part.split_once('-') {
                    let start = parse_index(start)?;
                    let end = parse_index(end)?;
                    if start > end {
                        return Err(PdfsError::InvalidPageIndex(format!(
                            "range start {} > end {}",
                            start, end
                        )));
                    }
                    selection.insert_range(start, end);
                } else {
                    let index = parse_index(part)?;
                    selection.insert_range(index, index);
                }
            }
        }

        Ok(selection)
    }

    pub fn insert(&mut self, index: u32) -> bool {
        if self.contains(index) {
            return false;
        }
        self.insert_range(index, index);
        true
    }

    /// Add `start..=end`, merging with overlapping or touching ranges.
    pub fn insert_range(&mut self, start: u32, end: u32) {
        let (mut start, mut end) = (start.min(end), start.max(end));
        let mut merged = Vec::with_capacity(self.0.len() + 1);

        for range in self.0.drain(..) {
            let (first, last) = (*range.start(), *range.end());
            if last.saturating_add(1) < start || end.saturating_add(1) < first {
                merged.push(range);
            } else {
                start = start.min(first);
                end = end.max(last);
            }
        }

        merged.push(start..=end);
        merged.sort_by_key(|range| *range.start());
        self.0 = merged;
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0
            .binary_search_by(|range| {
                if *range.end() < index {
                    Ordering::Less
                } else if *range.start() > index {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Number of selected indices.
    pub fn len(&self) -> u64 {
        self.0.iter().map(range_len).sum()
    }

    /// Number of selected indices at or above `first`.
    pub fn count_from(&self, first: u32) -> u64 {
        self.0
            .iter()
            .filter(|range| *range.end() >= first)
            .map(|range| range_len(&(first.max(*range.start())..=*range.end())))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(|range| range.clone())
    }

    /// The selection as sorted, disjoint ranges.
    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.0
    }
}

fn range_len(range: &RangeInclusive<u32>) -> u64 {
    u64::from(*range.end()) - u64::from(*range.start()) + 1
}

fn parse_index(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    raw.parse()
        .map_err(|_| PdfsError::InvalidPageIndex(format!("'{}' is not a page number", raw)))
}

impl FromIterator<u32> for PageSelection {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut selection = Self::new();
        for index in iter {
            selection.insert(index);
        }
        selection
    }
}

impl FromStr for PageSelection {
    type Err = PdfsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse([s])
    }
}

// -- Rotation -----------------------------------------------------------------

/// A clockwise page rotation, normalised into `0..360`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation(i32);

impl Rotation {
    pub const CW_90: Rotation = Rotation(90);
    pub const CW_180: Rotation = Rotation(180);
    pub const CW_270: Rotation = Rotation(270);

    /// Any multiple of 90 is accepted, negative values rotate
    /// counter-clockwise.
    pub fn new(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(PdfsError::InvalidRotation(degrees));
        }
        Ok(Self(degrees.rem_euclid(360)))
    }

    pub fn degrees(&self) -> i32 {
        self.0
    }

    /// Reduce a stored `/Rotate` value into `0..360`. Values that are not a
    /// multiple of 90 are invalid in a PDF and count as no rotation.
    pub fn normalize(existing: i64) -> i64 {
        let degrees = existing.rem_euclid(360);
        if degrees % 90 == 0 {
            degrees
        } else {
            0
        }
    }

    /// Combine with a page's existing `/Rotate` value.
    pub fn apply(&self, existing: i64) -> i64 {
        (Self::normalize(existing) + i64::from(self.0)) % 360
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::CW_90
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PdfsError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::new(degrees)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

// -- Paper --------------------------------------------------------------------

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl FromStr for PaperSize {
    type Err = PdfsError;

    /// Accepts the named sizes case-insensitively, or `WIDTHxHEIGHT` in
    /// millimetres.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" => Ok(Self::Tabloid),
            other => {
                let custom = other.split_once('x').and_then(|(w, h)| {
                    let width_mm = w.parse().ok()?;
                    let height_mm = h.parse().ok()?;
                    (width_mm > 0 && height_mm > 0).then_some(Self::Custom {
                        width_mm,
                        height_mm,
                    })
                });
                custom.ok_or_else(|| PdfsError::UnknownPaperSize(s.to_string()))
            }
        }
    }
}
