//! Thumbnail sizing

use super::decoder::DecodedImage;
use image::imageops::FilterType;

/// Fit `width`x`height` inside a `max_dimension` square, preserving aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is ever enlarged.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }

    let scale = f64::min(
        max_dimension as f64 / width as f64,
        max_dimension as f64 / height as f64,
    );

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
    (new_width, new_height)
}

/// Produce the thumbnail of `image` as an independent buffer, using Lanczos resampling.
pub fn thumbnail(image: &DecodedImage, max_dimension: u32) -> DecodedImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_within(width, height, max_dimension);

    if (new_width, new_height) == (width, height) {
        return image.clone();
    }

    tracing::debug!(
        from_width = width,
        from_height = height,
        to_width = new_width,
        to_height = new_height,
        "Resizing thumbnail"
    );

    DecodedImage::new(
        image
            .as_dynamic()
            .resize_exact(new_width, new_height, FilterType::Lanczos3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_fit_within_landscape_and_portrait() {
        assert_eq!(fit_within(4032, 3024, 300), (300, 225));
        assert_eq!(fit_within(3024, 4032, 300), (225, 300));
        assert_eq!(fit_within(400, 320, 300), (300, 240));
        assert_eq!(fit_within(1000, 1000, 300), (300, 300));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(100, 80, 300), (100, 80));
        assert_eq!(fit_within(300, 300, 300), (300, 300));
        assert_eq!(fit_within(300, 10, 300), (300, 10));
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 5, 300), (300, 1));
        assert_eq!(fit_within(1, 5_000, 300), (1, 300));
    }

    #[test]
    fn test_thumbnail_leaves_source_untouched() {
        let source = DecodedImage::new(DynamicImage::ImageRgb8(RgbImage::new(400, 320)));
        let thumb = thumbnail(&source, 300);
        assert_eq!(thumb.dimensions(), (300, 240));
        assert_eq!(source.dimensions(), (400, 320));
    }

    #[test]
    fn test_small_thumbnail_is_a_copy() {
        let source = DecodedImage::new(DynamicImage::ImageRgb8(RgbImage::new(100, 80)));
        assert_eq!(thumbnail(&source, 300).dimensions(), (100, 80));
    }
}
