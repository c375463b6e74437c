// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image converter — turn a raster image into a single-page PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: the page is a `PdfPage` holding a
// `Vec<Op>` operation list, serialised via `PdfDocument::save()`.

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use pdfs_core::ImageLayout;
use pdfs_core::error::{PdfsError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, instrument};

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// Converts raster images (JPEG, PNG, GIF, BMP, TIFF, WebP, ...) into
/// single-page PDF documents.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter {
    layout: ImageLayout,
}

impl ImageConverter {
    pub fn new(layout: ImageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Sniff the image format from the leading bytes, without decoding.
    pub fn detect(bytes: &[u8]) -> Option<ImageFormat> {
        ::image::guess_format(bytes).ok()
    }

    /// Convert encoded image bytes into a single-page PDF.
    ///
    /// Returns [`PdfsError::NotAnImage`] when the bytes carry no known image
    /// signature, so callers can fall back to other interpretations. Bytes
    /// that look like an image but fail to decode are an [`PdfsError::ImageError`].
    #[instrument(skip_all, fields(bytes_len = image_bytes.len()))]
    pub fn convert(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let format = Self::detect(image_bytes).ok_or(PdfsError::NotAnImage)?;

        let dynamic_image =
            ::image::load_from_memory_with_format(image_bytes, format).map_err(|err| {
                PdfsError::ImageError(format!("failed to decode {:?} image: {}", format, err))
            })?;

        debug!(
            ?format,
            width = dynamic_image.width(),
            height = dynamic_image.height(),
            "Image decoded"
        );

        self.convert_image(&dynamic_image)
    }

    /// Place an already-decoded image on a PDF page.
    pub fn convert_image(&self, dynamic_image: &DynamicImage) -> Result<Vec<u8>> {
        let dpi = self.layout.dpi;
        if !(dpi.is_finite() && dpi > 0.0) {
            return Err(PdfsError::ImageError(format!(
                "resolution must be positive, got {} dpi",
                dpi
            )));
        }

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;
        if img_width == 0 || img_height == 0 {
            return Err(PdfsError::ImageError("image has no pixels".into()));
        }

        // printpdf gets RGB8; transparency is composited over white.
        let rgb_image = flatten_onto_white(dynamic_image);
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new("Converted image");
        let xobject_id = doc.add_image(&raw);

        // Image native size in points at the configured DPI.
        let img_w_pt = img_width as f32 / dpi * PT_PER_INCH;
        let img_h_pt = img_height as f32 / dpi * PT_PER_INCH;

        let (page_w, page_h, transform) = match self.layout.paper_size {
            None => {
                // Page is exactly the image.
                let page_w = Mm(img_width as f32 / dpi * MM_PER_INCH);
                let page_h = Mm(img_height as f32 / dpi * MM_PER_INCH);
                let transform = XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(dpi),
                    rotate: None,
                };
                (page_w, page_h, transform)
            }
            Some(paper_size) => {
                let (w_mm, h_mm) = paper_size.dimensions_mm();
                let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));

                let margin_mm = self.layout.margin_mm.max(0.0);
                let usable_w_pt = Mm((page_w.0 - 2.0 * margin_mm).max(1.0)).into_pt().0;
                let usable_h_pt = Mm((page_h.0 - 2.0 * margin_mm).max(1.0)).into_pt().0;

                // Scale to fit while preserving aspect ratio; do not upscale.
                let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);
                let rendered_w_pt = img_w_pt * scale;
                let rendered_h_pt = img_h_pt * scale;

                // Centre the image on the page.
                let margin_pt = Mm(margin_mm).into_pt().0;
                let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
                let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

                let transform = XObjectTransform {
                    translate_x: Some(Pt(x_offset)),
                    translate_y: Some(Pt(y_offset)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(dpi),
                    rotate: None,
                };
                (page_w, page_h, transform)
            }
        };

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform,
        }];
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!(
            page_w_mm = page_w.0,
            page_h_mm = page_h.0,
            paper = ?self.layout.paper_size,
            "Image placed on page"
        );

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }
}

/// Composite any alpha channel over a white background.
fn flatten_onto_white(dynamic_image: &DynamicImage) -> RgbImage {
    if !dynamic_image.color().has_alpha() {
        return dynamic_image.to_rgb8();
    }

    let rgba = dynamic_image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u16::from(a);
        let blend =
            |channel: u8| ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{media_box, png_bytes};
    use lopdf::Document;
    use pdfs_core::PaperSize;

    #[test]
    fn pdf_bytes_are_not_an_image() {
        let converter = ImageConverter::default();
        let result = converter.convert(b"%PDF-1.5\n%%EOF");
        assert!(matches!(result, Err(PdfsError::NotAnImage)));
    }

    #[test]
    fn corrupt_image_is_an_image_error() {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(b"definitely not png chunks");

        let converter = ImageConverter::default();
        let result = converter.convert(&bytes);
        assert!(matches!(result, Err(PdfsError::ImageError(_))));
    }

    #[test]
    fn png_becomes_single_page_pdf() {
        let converter = ImageConverter::default();
        let pdf = converter.convert(&png_bytes(40, 20)).expect("conversion failed");

        let doc = Document::load_mem(&pdf).expect("output must be a PDF");
        assert_eq!(doc.get_pages().len(), 1);
    }

    /// At 96 dpi, 40x20 pixels is 30x15 points.
    #[test]
    fn page_is_sized_to_image_by_default() {
        let converter = ImageConverter::default();
        let pdf = converter.convert(&png_bytes(40, 20)).unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let [x0, y0, x1, y1] = media_box(&doc, page_id).expect("page has a media box");

        assert!(((x1 - x0) - 30.0).abs() < 0.5, "width was {}", x1 - x0);
        assert!(((y1 - y0) - 15.0).abs() < 0.5, "height was {}", y1 - y0);
    }

    #[test]
    fn paper_size_sets_page_dimensions() {
        let converter = ImageConverter::new(ImageLayout {
            paper_size: Some(PaperSize::A4),
            ..ImageLayout::default()
        });
        let pdf = converter.convert(&png_bytes(40, 20)).unwrap();

        let doc = Document::load_mem(&pdf).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let [x0, _, x1, _] = media_box(&doc, page_id).unwrap();

        // A4 is 210mm, about 595pt wide.
        assert!(((x1 - x0) - 595.0).abs() < 2.0, "width was {}", x1 - x0);
    }

    #[test]
    fn non_positive_dpi_is_rejected() {
        let converter = ImageConverter::new(ImageLayout {
            dpi: 0.0,
            ..ImageLayout::default()
        });
        let result = converter.convert(&png_bytes(4, 4));
        assert!(matches!(result, Err(PdfsError::ImageError(_))));
    }

    #[test]
    fn transparency_is_flattened_onto_white() {
        let image = DynamicImage::ImageRgba8(::image::RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([10, 20, 30, 0]),
            1 => Rgba([10, 20, 30, 255]),
            _ => Rgba([0, 0, 0, 128]),
        }));

        let flat = flatten_onto_white(&image);

        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([10, 20, 30]));
        assert_eq!(*flat.get_pixel(2, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn transparent_png_converts() {
        let image = DynamicImage::ImageRgba8(::image::RgbaImage::new(8, 8));
        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let pdf = ImageConverter::default().convert(&png).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn detect_recognises_png() {
        assert_eq!(
            ImageConverter::detect(&png_bytes(2, 2)),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageConverter::detect(b"hello"), None);
    }
}
