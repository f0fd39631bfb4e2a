use crate::format::SourceFormat;

/// Failures raised while turning uploaded bytes into AVIF variants
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("cannot decode {format} image: {message}")]
    Decode {
        format: SourceFormat,
        message: String,
    },

    #[error("{0} decoding is not available in this build")]
    UnsupportedFormat(SourceFormat),

    #[error("AVIF encoding failed: {0}")]
    Encode(String),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("conversion cancelled")]
    Cancelled,
}

impl ConversionError {
    pub(crate) fn decode(format: SourceFormat, err: impl std::fmt::Display) -> Self {
        ConversionError::Decode {
            format,
            message: err.to_string(),
        }
    }

    /// True when the failure stems from the uploaded bytes rather than the encoder.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConversionError::Decode { .. }
                | ConversionError::UnsupportedFormat(_)
                | ConversionError::InvalidDimensions { .. }
        )
    }
}
