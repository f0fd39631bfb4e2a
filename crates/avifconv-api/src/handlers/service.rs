//! Service descriptor and liveness probe

use std::sync::Arc;

use avifconv_core::config::SUPPORTED_FORMATS;
use avifconv_core::models::{HealthResponse, ServiceDescriptor};
use axum::{extract::State, Json};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "HEIC/JPEG to AVIF Converter";

/// Describe the service and its fixed conversion settings
///
/// Only formats this build can decode are listed.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service descriptor", body = ServiceDescriptor)
    )
)]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: SERVICE_NAME.to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        quality: state.config.avif_quality,
        max_file_size_mb: state.config.max_file_size_mb(),
        supported_formats: SUPPORTED_FORMATS
            .iter()
            .filter(|format| state.image_validator.allows_extension(format))
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
