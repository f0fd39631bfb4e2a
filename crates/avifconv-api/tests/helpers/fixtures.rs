use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// A JPEG of the given size with a horizontal gradient.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    encode_jpeg(DynamicImage::ImageRgb8(img))
}

pub fn encode_jpeg(image: DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("Failed to encode JPEG fixture");
    out.into_inner()
}

/// A file from `tests/fixtures/`.
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Multipart form with a single `file` part.
pub fn file_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data)
            .file_name(filename.to_string())
            .mime_type("application/octet-stream"),
    )
}

/// Width and height recorded in an AVIF container.
pub fn avif_dimensions(data: &[u8]) -> (u32, u32) {
    let avif = avif_parse::read_avif(&mut Cursor::new(data)).expect("Invalid AVIF");
    let meta = avif
        .primary_item_metadata()
        .expect("Missing AVIF metadata");
    (meta.max_frame_width.get(), meta.max_frame_height.get())
}
