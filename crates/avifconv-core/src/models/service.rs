use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static service descriptor returned by `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceDescriptor {
    #[schema(example = "HEIC/JPEG to AVIF Converter")]
    pub service: String,
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
    /// AVIF encoder quality used for every variant
    pub quality: u8,
    pub max_file_size_mb: usize,
    pub supported_formats: Vec<String>,
}

/// Liveness probe body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
