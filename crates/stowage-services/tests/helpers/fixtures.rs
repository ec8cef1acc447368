//! Test fixtures: encoded images and documents.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// JPEG of the given size filled with a flat colour.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

/// Document-sized payload with a PDF header.
pub fn create_test_pdf(size: usize) -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n".to_vec();
    pdf.resize(size, b' ');
    pdf
}

pub fn create_test_svg() -> Vec<u8> {
    br#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32"><rect width="64" height="32"/></svg>"#
        .to_vec()
}
