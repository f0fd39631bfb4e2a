//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use avifconv_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HEIC/JPEG to AVIF Converter",
        description = "Converts uploaded HEIC, HEIF and JPEG images to AVIF. JSON endpoints return a full-size image and a 300 px thumbnail, base64-encoded; /convert-stream returns the AVIF file directly."
    ),
    paths(
        handlers::service::service_info,
        handlers::service::health_check,
        handlers::convert::convert,
        handlers::convert::convert_stream,
        handlers::convert::convert_jpeg,
    ),
    components(schemas(
        models::ServiceDescriptor,
        models::HealthResponse,
        models::ConversionResponse,
        models::VariantResponse,
        models::VariantKind,
        error::ErrorResponse,
    )),
    tags(
        (name = "service", description = "Service metadata and health"),
        (name = "conversion", description = "Image to AVIF conversion")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
