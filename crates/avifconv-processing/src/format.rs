//! Source format detection.
//!
//! The upload's extension picks a decoder up front; the leading bytes of the payload
//! override it when they clearly identify a different container.

use std::fmt;

/// HEIF major brands that identify a HEIC/HEIF still image or sequence.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1", b"heif",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Heif,
    Jpeg,
}

impl SourceFormat {
    /// Map a lowercase file extension (without the dot) to a source format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "heic" | "heif" => Some(SourceFormat::Heif),
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            _ => None,
        }
    }

    /// Identify the container from its leading bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(SourceFormat::Jpeg);
        }

        if data.len() >= 12 && &data[4..8] == b"ftyp" {
            let brand = &data[8..12];
            if HEIF_BRANDS.iter().any(|b| b.as_slice() == brand) {
                return Some(SourceFormat::Heif);
            }
        }

        None
    }

    /// Pick the decoder for a payload: sniffed bytes win over the extension hint.
    pub fn resolve(hint: SourceFormat, data: &[u8]) -> Self {
        match Self::sniff(data) {
            Some(detected) if detected != hint => {
                tracing::debug!(
                    hint = %hint,
                    detected = %detected,
                    "Payload does not match its extension, using detected format"
                );
                detected
            }
            Some(detected) => detected,
            None => hint,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Heif => "HEIF",
            SourceFormat::Jpeg => "JPEG",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heif_header(brand: &[u8; 4]) -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftyp");
        data.extend_from_slice(brand);
        data.extend_from_slice(&[0u8; 12]);
        data
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceFormat::from_extension("heic"), Some(SourceFormat::Heif));
        assert_eq!(SourceFormat::from_extension("heif"), Some(SourceFormat::Heif));
        assert_eq!(SourceFormat::from_extension("jpg"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_extension("jpeg"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_extension("png"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(
            SourceFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(SourceFormat::Jpeg)
        );
        assert_eq!(SourceFormat::sniff(&heif_header(b"heic")), Some(SourceFormat::Heif));
        assert_eq!(SourceFormat::sniff(&heif_header(b"mif1")), Some(SourceFormat::Heif));
        assert_eq!(SourceFormat::sniff(&heif_header(b"avif")), None);
        assert_eq!(SourceFormat::sniff(b"not an image"), None);
        assert_eq!(SourceFormat::sniff(&[]), None);
    }

    #[test]
    fn test_resolve_prefers_detected_format() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xDB];
        assert_eq!(SourceFormat::resolve(SourceFormat::Heif, &jpeg), SourceFormat::Jpeg);
        assert_eq!(
            SourceFormat::resolve(SourceFormat::Jpeg, &heif_header(b"heic")),
            SourceFormat::Heif
        );
        assert_eq!(SourceFormat::resolve(SourceFormat::Heif, b"garbage"), SourceFormat::Heif);
    }
}
