//! The uploaded file as received from the multipart form, and output naming.

use avifconv_core::models::VariantKind;
use bytes::Bytes;
use std::path::Path;

/// Stem used when the upload carries no usable filename.
pub const FALLBACK_STEM: &str = "image";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename, untrusted.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Size announced by the client, if any; advisory only.
    pub declared_size: Option<u64>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: Option<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename,
            content_type,
            declared_size: None,
            data,
        }
    }

    pub fn with_declared_size(mut self, declared_size: Option<u64>) -> Self {
        self.declared_size = declared_size;
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Lowercase extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Base name of the upload without its last extension; falls back to `image`.
pub fn file_stem(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// Output filename of a variant: `{stem}.avif` or `{stem}_thumb.avif`.
pub fn output_filename(filename: Option<&str>, kind: VariantKind) -> String {
    format!("{}{}.avif", file_stem(filename), kind.filename_suffix())
}
