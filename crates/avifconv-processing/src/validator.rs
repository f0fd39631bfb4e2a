use crate::format::SourceFormat;
use crate::image::decoder_for;
use crate::upload::{file_extension, UploadedFile};
use avifconv_core::Config;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large. Maximum size: {}", human_size(.max))]
    FileTooLarge { size: u64, max: usize },

    #[error("Invalid file type. Allowed: {}", dotted(.allowed))]
    InvalidExtension {
        extension: Option<String>,
        allowed: Vec<String>,
    },

    #[error("No filename provided")]
    MissingFilename,

    #[error("File is empty")]
    EmptyFile,
}

fn dotted(extensions: &[String]) -> String {
    extensions
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(", ")
}

fn human_size(bytes: &usize) -> String {
    if *bytes >= 1024 * 1024 {
        format!("{}MB", bytes / 1024 / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Upload validator
///
/// Checks run cheapest first: the filename before any body bytes are read, the
/// declared size before buffering, the buffered size last.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    require_filename: bool,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            require_filename: false,
        }
    }

    /// Validator for the generic endpoints (HEIC, HEIF, JPEG).
    ///
    /// Extensions whose decoder is not compiled in are dropped, so such uploads are
    /// rejected as an invalid file type instead of failing during conversion.
    pub fn for_images(config: &Config) -> Self {
        let decodable = config
            .allowed_extensions
            .iter()
            .filter(|ext| {
                SourceFormat::from_extension(ext).is_some_and(|f| decoder_for(f).is_available())
            })
            .cloned()
            .collect();
        Self::new(config.max_file_size_bytes, decodable)
    }

    /// Validator for the JPEG-only endpoint; a missing filename is reported as such.
    pub fn for_jpeg(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.jpeg_allowed_extensions.clone(),
        )
        .with_required_filename()
    }

    pub fn with_required_filename(mut self) -> Self {
        self.require_filename = true;
        self
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    /// Validate the filename and return the format its extension announces.
    pub fn validate_filename(&self, filename: Option<&str>) -> Result<SourceFormat, ValidationError> {
        let filename = filename.filter(|name| !name.is_empty());

        let Some(filename) = filename else {
            if self.require_filename {
                return Err(ValidationError::MissingFilename);
            }
            return Err(self.invalid_extension(None));
        };

        let extension = file_extension(filename);
        match extension {
            Some(ext) if self.allowed_extensions.contains(&ext) => SourceFormat::from_extension(&ext)
                .ok_or_else(|| self.invalid_extension(Some(ext))),
            other => Err(self.invalid_extension(other)),
        }
    }

    /// Reject a size announced by the client before the body is buffered.
    pub fn validate_declared_size(&self, declared: Option<u64>) -> Result<(), ValidationError> {
        match declared {
            Some(size) if size > self.max_file_size as u64 => Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            }),
            _ => Ok(()),
        }
    }

    /// Validate the number of bytes actually received.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: size as u64,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate a fully received upload.
    pub fn validate_upload(&self, file: &UploadedFile) -> Result<SourceFormat, ValidationError> {
        let format = self.validate_filename(file.filename.as_deref())?;
        self.validate_declared_size(file.declared_size)?;
        self.validate_file_size(file.size())?;
        Ok(format)
    }

    fn invalid_extension(&self, extension: Option<String>) -> ValidationError {
        ValidationError::InvalidExtension {
            extension,
            allowed: self.allowed_extensions.clone(),
        }
    }
}
