//! avifconv Processing Library
//!
//! Decoding, color normalization, resizing and AVIF encoding of uploaded images, plus
//! upload validation. Everything here is synchronous and CPU-bound; the API crate runs
//! it on the blocking pool.

pub mod compression;
pub mod error;
pub mod format;
pub mod image;
pub mod pipeline;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::AvifEncoder;
pub use error::ConversionError;
pub use format::SourceFormat;
pub use crate::image::{ColorMode, DecodedImage, ImageDecoder};
pub use pipeline::{
    ConversionPipeline, ConversionResult, ConversionSettings, ConversionVariant, VariantSet,
};
pub use upload::UploadedFile;
pub use validator::{UploadValidator, ValidationError};
