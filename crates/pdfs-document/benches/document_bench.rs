// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pdfs-document crate: converting an image into
// a PDF page, and joining several small documents.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use pdfs_document::{ImageConverter, PdfReader, PdfWriter};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 256x256 PNG with a simple gradient.
fn png_fixture() -> Vec<u8> {
    let img = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, 96]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("fixture PNG must encode");
    bytes
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_image_to_pdf(c: &mut Criterion) {
    let png = png_fixture();
    let converter = ImageConverter::default();

    c.bench_function("image_to_pdf (256x256 png)", |b| {
        b.iter(|| black_box(converter.convert(black_box(&png)).expect("conversion")));
    });
}

/// Join eight single-page image documents into one.
fn bench_join_pages(c: &mut Criterion) {
    let page = ImageConverter::default()
        .convert(&png_fixture())
        .expect("conversion");
    let readers: Vec<PdfReader> = (0..8)
        .map(|_| PdfReader::from_bytes(&page).expect("reader"))
        .collect();

    c.bench_function("join 8 image pages", |b| {
        b.iter(|| {
            let mut writer = PdfWriter::new();
            for reader in &readers {
                writer.append_document(reader).expect("append");
            }
            black_box(writer.to_bytes().expect("serialise"));
        });
    });
}

criterion_group!(benches, bench_image_to_pdf, bench_join_pages);
criterion_main!(benches);
