//! Conversion pipeline: decode, normalize, encode the full image and optionally a thumbnail.
//!
//! All pixel buffers live for the duration of a single `convert` call; nothing touches
//! the filesystem.

use crate::compression::AvifEncoder;
use crate::error::ConversionError;
use crate::format::SourceFormat;
use crate::image::{decoder_for, normalize_color_mode, thumbnail, ColorMode, DecodedImage};
use crate::upload::output_filename;
use avifconv_core::models::VariantKind;
use avifconv_core::Config;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    pub quality: u8,
    pub speed: u8,
    pub thumbnail_max_dimension: u32,
}

impl ConversionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quality: config.avif_quality,
            speed: config.avif_speed,
            thumbnail_max_dimension: config.thumbnail_max_dimension,
        }
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Which variants a request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSet {
    FullOnly,
    FullAndThumbnail,
}

/// One encoded output image.
#[derive(Debug, Clone)]
pub struct ConversionVariant {
    pub kind: VariantKind,
    pub filename: String,
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}

impl ConversionVariant {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// What the pipeline learned about the input.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
    pub color_mode: ColorMode,
    pub input_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub source: SourceSummary,
    pub full: ConversionVariant,
    pub thumbnail: Option<ConversionVariant>,
}

impl ConversionResult {
    /// Variants in response order: full first, then the thumbnail.
    pub fn into_variants(self) -> Vec<ConversionVariant> {
        let mut variants = vec![self.full];
        variants.extend(self.thumbnail);
        variants
    }

    /// Space saved by the full variant relative to the input.
    pub fn compression_ratio(&self) -> Option<f64> {
        compression_ratio(self.source.input_bytes, self.full.size())
    }
}

/// Fraction of the input size saved by the output (`1 - out/in`); `None` for empty input.
pub fn compression_ratio(input_bytes: usize, output_bytes: usize) -> Option<f64> {
    if input_bytes == 0 {
        return None;
    }
    Some(1.0 - output_bytes as f64 / input_bytes as f64)
}

/// Stateless converter shared by all requests.
#[derive(Debug, Clone)]
pub struct ConversionPipeline {
    settings: ConversionSettings,
    encoder: AvifEncoder,
}

impl ConversionPipeline {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            encoder: AvifEncoder::new(settings.quality, settings.speed),
        }
    }

    /// Convert one upload.
    ///
    /// `hint` comes from the file extension; the payload's magic bytes override it.
    pub fn convert(
        &self,
        data: &[u8],
        hint: SourceFormat,
        filename: Option<&str>,
        variants: VariantSet,
    ) -> Result<ConversionResult, ConversionError> {
        self.convert_cancellable(data, hint, filename, variants, &AtomicBool::new(false))
    }

    /// Like [`convert`](Self::convert), but gives up with `Cancelled` once `cancelled`
    /// is set. The flag is checked after decoding and before each encode.
    #[tracing::instrument(skip_all, fields(input_bytes = data.len(), hint = %hint, ?variants))]
    pub fn convert_cancellable(
        &self,
        data: &[u8],
        hint: SourceFormat,
        filename: Option<&str>,
        variants: VariantSet,
        cancelled: &AtomicBool,
    ) -> Result<ConversionResult, ConversionError> {
        let started = Instant::now();
        let check_cancelled = || {
            if cancelled.load(Ordering::Relaxed) {
                tracing::debug!("Conversion cancelled");
                Err(ConversionError::Cancelled)
            } else {
                Ok(())
            }
        };
        let format = SourceFormat::resolve(hint, data);

        let decoded = decoder_for(format).decode(data)?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions { width, height });
        }

        let source = SourceSummary {
            format,
            width,
            height,
            color_mode: decoded.color_mode(),
            input_bytes: data.len(),
        };
        tracing::info!(
            format = %format,
            width,
            height,
            mode = %source.color_mode,
            "Decoded source image"
        );

        check_cancelled()?;
        let image = normalize_color_mode(decoded);
        let full = self.encode_variant(&image, VariantKind::Full, filename, data.len())?;

        let thumbnail_variant = match variants {
            VariantSet::FullOnly => None,
            VariantSet::FullAndThumbnail => {
                check_cancelled()?;
                let thumb = thumbnail(&image, self.settings.thumbnail_max_dimension);
                Some(self.encode_variant(&thumb, VariantKind::Thumbnail, filename, data.len())?)
            }
        };

        let result = ConversionResult {
            source,
            full,
            thumbnail: thumbnail_variant,
        };

        tracing::info!(
            full_bytes = result.full.size(),
            thumbnail_bytes = result.thumbnail.as_ref().map(|t| t.size()),
            compression_ratio = result.compression_ratio(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Conversion completed"
        );

        Ok(result)
    }

    fn encode_variant(
        &self,
        image: &DecodedImage,
        kind: VariantKind,
        filename: Option<&str>,
        input_bytes: usize,
    ) -> Result<ConversionVariant, ConversionError> {
        let data = self.encoder.encode(image)?;
        let (width, height) = image.dimensions();

        tracing::info!(
            variant = %kind,
            width,
            height,
            bytes = data.len(),
            compression_ratio = compression_ratio(input_bytes, data.len()),
            "Encoded variant"
        );

        Ok(ConversionVariant {
            kind,
            filename: output_filename(filename, kind),
            data: Bytes::from(data),
            width,
            height,
        })
    }
}
