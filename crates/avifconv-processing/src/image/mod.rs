//! Image processing module
//!
//! - Decoding of JPEG and HEIF payloads into pixel buffers (decoder)
//! - Color mode normalization ahead of encoding (color)
//! - Aspect-preserving thumbnail resizing (resize)

pub mod color;
pub mod decoder;
pub mod resize;

pub use color::{normalize_color_mode, ColorMode};
pub use decoder::{decoder_for, DecodedImage, HeifDecoder, ImageDecoder, JpegDecoder};
pub use resize::{fit_within, thumbnail};
