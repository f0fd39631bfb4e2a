use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// MIME type of every variant produced by the service.
pub const AVIF_MIME_TYPE: &str = "image/avif";

/// Role of one rendition of a converted image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Full,
    Thumbnail,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Full => "full",
            VariantKind::Thumbnail => "thumbnail",
        }
    }

    /// Suffix appended to the input stem when naming the output file.
    pub fn filename_suffix(self) -> &'static str {
        match self {
            VariantKind::Full => "",
            VariantKind::Thumbnail => "_thumb",
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One encoded variant as returned by the JSON conversion endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariantResponse {
    pub variant: VariantKind,
    #[schema(example = "IMG_1189.avif")]
    pub filename: String,
    /// Base64-encoded AVIF bytes
    pub content: String,
    /// Size of the decoded content in bytes
    pub size: usize,
    #[schema(example = "image/avif")]
    pub mimetype: String,
}

/// Response body of `POST /convert` and `POST /convert-jpeg`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionResponse {
    pub success: bool,
    pub original_filename: Option<String>,
    pub variants: Vec<VariantResponse>,
}
