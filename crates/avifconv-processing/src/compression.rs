//! AVIF encoding

use crate::error::ConversionError;
use crate::image::DecodedImage;
use image::DynamicImage;

/// Side of the synthetic image encoded by [`AvifEncoder::self_test`].
const SELF_TEST_DIMENSION: u32 = 100;

/// AVIF encoder with fixed quality and speed.
#[derive(Debug, Clone, Copy)]
pub struct AvifEncoder {
    quality: u8,
    speed: u8,
}

impl AvifEncoder {
    pub fn new(quality: u8, speed: u8) -> Self {
        Self { quality, speed }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Encode one image into a standalone AVIF file.
    ///
    /// RGBA input keeps its alpha channel; every other layout is encoded as RGB.
    pub fn encode(&self, image: &DecodedImage) -> Result<Vec<u8>, ConversionError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions { width, height });
        }

        let encoder = ravif::Encoder::new()
            .with_quality(self.quality as f32)
            .with_alpha_quality(self.quality as f32)
            .with_speed(self.speed);

        let encoded = match image.as_dynamic() {
            DynamicImage::ImageRgba8(rgba) => {
                let pixels: Vec<rgb::RGBA8> = rgba
                    .as_raw()
                    .chunks_exact(4)
                    .map(|c| rgb::RGBA8::new(c[0], c[1], c[2], c[3]))
                    .collect();
                let img = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);
                encoder.encode_rgba(img)
            }
            other => {
                let rgb_img = other.to_rgb8();
                let pixels: Vec<rgb::RGB8> = rgb_img
                    .as_raw()
                    .chunks_exact(3)
                    .map(|c| rgb::RGB8::new(c[0], c[1], c[2]))
                    .collect();
                let img = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);
                encoder.encode_rgb(img)
            }
        }
        .map_err(|e| ConversionError::Encode(e.to_string()))?;

        Ok(encoded.avif_file)
    }

    /// Encode a small solid red image; proves the encoder works on this host.
    ///
    /// Returns the size of the produced file.
    pub fn self_test(&self) -> Result<usize, ConversionError> {
        let red = image::RgbImage::from_pixel(
            SELF_TEST_DIMENSION,
            SELF_TEST_DIMENSION,
            image::Rgb([255, 0, 0]),
        );
        let encoded = self.encode(&DecodedImage::new(DynamicImage::ImageRgb8(red)))?;

        if encoded.is_empty() {
            return Err(ConversionError::Encode(
                "encoder produced an empty file".to_string(),
            ));
        }

        Ok(encoded.len())
    }
}
