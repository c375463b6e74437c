// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that shape how pdfs builds its output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfsConfig {
    /// Page layout used when an image input is converted into a PDF page.
    pub image: ImageLayout,
}

impl PdfsConfig {
    /// Load a configuration from a JSON file. Missing fields keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// How a raster image is placed on its PDF page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLayout {
    /// Fixed paper size. `None` sizes the page to the image itself.
    pub paper_size: Option<crate::PaperSize>,
    /// Resolution used to turn pixels into physical page units.
    pub dpi: f32,
    /// Margin kept around the image when a paper size is set.
    pub margin_mm: f32,
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            paper_size: None,
            dpi: 96.0,
            margin_mm: 15.0,
        }
    }
}
