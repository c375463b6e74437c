// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic fixtures shared by the unit tests: small PDFs built with lopdf and
// small images encoded with the image crate.

use std::io::Cursor;

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::pdf::reader::{inherited_attribute, resolve};

/// A PDF whose pages each draw the text `{label}-{index}`. Resources and the
/// media box live on the `/Pages` node, so pages inherit them.
pub(crate) fn pdf_with_pages(count: u32, label: &str) -> Vec<u8> {
    build_pdf(count, label, None)
}

/// A single-page PDF whose rotation is set on the `/Pages` node only.
pub(crate) fn pdf_with_tree_rotation(degrees: i64) -> Vec<u8> {
    build_pdf(1, "R", Some(degrees))
}

fn build_pdf(count: u32, label: &str, tree_rotation: Option<i64>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for index in 0..count {
        let content = format!("BT /F1 12 Tf 50 700 Td ({}-{}) Tj ET", label, index);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(i64::from(count)),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ],
    };
    if let Some(degrees) = tree_rotation {
        pages.set("Rotate", Object::Integer(degrees));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture PDF must serialise");
    output
}

/// The `(text)` drawn on each page, in page order. Pages without text yield
/// an empty string.
pub(crate) fn page_texts(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).unwrap_or_default();
            let content = String::from_utf8_lossy(&content);
            match (content.find('('), content.find(')')) {
                (Some(start), Some(end)) if start < end => content[start + 1..end].to_string(),
                _ => String::new(),
            }
        })
        .collect()
}

/// The page's effective media box.
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let value = inherited_attribute(doc, page_id, b"MediaBox")?;
    let Object::Array(items) = resolve(doc, value)? else {
        return None;
    };

    let mut corners = [0.0f32; 4];
    for (slot, item) in corners.iter_mut().zip(items.iter()) {
        *slot = match resolve(doc, item)? {
            Object::Integer(value) => *value as f32,
            Object::Real(value) => *value as f32,
            _ => return None,
        };
    }
    (items.len() == 4).then_some(corners)
}

/// Whether the page's resources include an image XObject.
pub(crate) fn page_has_image(doc: &Document, page_id: ObjectId) -> bool {
    let Some(Object::Dictionary(resources)) =
        inherited_attribute(doc, page_id, b"Resources").and_then(|value| resolve(doc, value))
    else {
        return false;
    };
    let Some(Object::Dictionary(xobjects)) = resources
        .get(b"XObject")
        .ok()
        .and_then(|value| resolve(doc, value))
    else {
        return false;
    };

    xobjects.iter().any(|(_, value)| {
        matches!(
            resolve(doc, value),
            Some(Object::Stream(stream))
                if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(&b"Image"[..])
        )
    })
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut output = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut output), format)
        .expect("fixture image must encode");
    output
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5) as u8, (y * 5) as u8, 128])
    }))
}

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height), ImageFormat::Png)
}

pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(gradient(width, height), ImageFormat::Jpeg)
}
