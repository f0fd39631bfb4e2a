//! Decoders turning uploaded bytes into pixel buffers

use super::color::ColorMode;
use crate::error::ConversionError;
use crate::format::SourceFormat;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// A decoded raster image, owned by the pipeline for the duration of one request.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::of(&self.image)
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_inner(self) -> DynamicImage {
        self.image
    }
}

/// Decodes one source container format.
pub trait ImageDecoder: Send + Sync {
    fn format(&self) -> SourceFormat;

    /// Whether this build can decode the format at all.
    fn is_available(&self) -> bool {
        true
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedImage, ConversionError>;
}

pub struct JpegDecoder;

impl ImageDecoder for JpegDecoder {
    fn format(&self) -> SourceFormat {
        SourceFormat::Jpeg
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedImage, ConversionError> {
        let image = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| ConversionError::decode(SourceFormat::Jpeg, e))?;
        Ok(DecodedImage::new(image))
    }
}

/// HEIC/HEIF decoder backed by libheif.
///
/// Without the `heic` feature every decode fails with `UnsupportedFormat`.
pub struct HeifDecoder;

impl ImageDecoder for HeifDecoder {
    fn format(&self) -> SourceFormat {
        SourceFormat::Heif
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "heic")
    }

    #[cfg(feature = "heic")]
    fn decode(&self, data: &[u8]) -> Result<DecodedImage, ConversionError> {
        use image::{RgbImage, RgbaImage};
        use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

        let fail = |e: libheif_rs::HeifError| ConversionError::decode(SourceFormat::Heif, e);

        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(data).map_err(fail)?;
        let handle = ctx.primary_image_handle().map_err(fail)?;

        let has_alpha = handle.has_alpha_channel();
        let chroma = if has_alpha {
            RgbChroma::Rgba
        } else {
            RgbChroma::Rgb
        };
        let decoded = lib_heif
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(fail)?;

        let planes = decoded.planes();
        let plane = planes.interleaved.ok_or_else(|| {
            ConversionError::decode(SourceFormat::Heif, "no interleaved RGB plane")
        })?;

        let (width, height) = (plane.width, plane.height);
        let channels = if has_alpha { 4 } else { 3 };
        let row_len = width as usize * channels;

        // libheif rows may be padded; copy only the visible pixels.
        let mut pixels = Vec::with_capacity(row_len * height as usize);
        for row in plane.data.chunks(plane.stride).take(height as usize) {
            let visible = row.get(..row_len).ok_or_else(|| {
                ConversionError::decode(SourceFormat::Heif, "truncated pixel row")
            })?;
            pixels.extend_from_slice(visible);
        }

        let image = if has_alpha {
            RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
        } else {
            RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
        }
        .ok_or(ConversionError::InvalidDimensions { width, height })?;

        Ok(DecodedImage::new(image))
    }

    #[cfg(not(feature = "heic"))]
    fn decode(&self, _data: &[u8]) -> Result<DecodedImage, ConversionError> {
        Err(ConversionError::UnsupportedFormat(SourceFormat::Heif))
    }
}

static JPEG_DECODER: JpegDecoder = JpegDecoder;
static HEIF_DECODER: HeifDecoder = HeifDecoder;

/// Decoder registered for a source format.
pub fn decoder_for(format: SourceFormat) -> &'static dyn ImageDecoder {
    match format {
        SourceFormat::Jpeg => &JPEG_DECODER,
        SourceFormat::Heif => &HEIF_DECODER,
    }
}
