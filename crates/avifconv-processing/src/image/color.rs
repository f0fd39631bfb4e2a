//! Color mode classification and normalization

use super::decoder::DecodedImage;
use image::{ColorType, DynamicImage};
use std::fmt;

/// Color layout of a decoded image, as seen by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    /// Anything else (grayscale, 16-bit, float), named after the decoder's color type.
    Other(String),
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::Rgb8 => ColorMode::Rgb,
            ColorType::Rgba8 => ColorMode::Rgba,
            other => ColorMode::Other(format!("{:?}", other)),
        }
    }

    /// Whether the encoder accepts this layout as-is.
    pub fn is_encodable(&self) -> bool {
        matches!(self, ColorMode::Rgb | ColorMode::Rgba)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Rgb => f.write_str("RGB"),
            ColorMode::Rgba => f.write_str("RGBA"),
            ColorMode::Other(name) => f.write_str(name),
        }
    }
}

/// Convert anything that is not 8-bit RGB or RGBA to 8-bit RGB.
///
/// Returns the image unchanged when it is already encodable.
pub fn normalize_color_mode(image: DecodedImage) -> DecodedImage {
    let mode = image.color_mode();
    if mode.is_encodable() {
        return image;
    }

    tracing::debug!(from = %mode, "Normalizing color mode to RGB");
    DecodedImage::new(DynamicImage::ImageRgb8(image.into_inner().to_rgb8()))
}
