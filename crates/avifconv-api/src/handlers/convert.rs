use std::sync::Arc;

use avifconv_core::models::{ConversionResponse, VariantResponse, AVIF_MIME_TYPE};
use avifconv_core::AppError;
use avifconv_processing::{ConversionResult, ConversionVariant, UploadValidator, VariantSet};
use axum::{
    body::Body,
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{multipart_rejection_to_app_error, ErrorResponse, HttpAppError};
use crate::services::run_conversion;
use crate::state::AppState;
use crate::utils::upload::extract_upload;

/// Convert a HEIC/HEIF/JPEG upload to AVIF
///
/// Returns the full-size image and a thumbnail (longest side at most 300 px), both
/// base64-encoded.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "conversion",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `file`: a .heic, .heif, .jpg or .jpeg image"),
    responses(
        (status = 200, description = "Image converted", body = ConversionResponse),
        (status = 400, description = "Missing file, invalid file type or empty file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
        (status = 503, description = "Conversion timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "convert"))]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>, HttpAppError> {
    convert_to_json(&state, multipart, &state.image_validator).await
}

/// Convert a JPEG upload to AVIF
///
/// Same response as `/convert`, but only `.jpg` and `.jpeg` uploads are accepted.
#[utoipa::path(
    post,
    path = "/convert-jpeg",
    tag = "conversion",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `file`: a .jpg or .jpeg image"),
    responses(
        (status = 200, description = "Image converted", body = ConversionResponse),
        (status = 400, description = "Missing file or filename, invalid file type or empty file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
        (status = 503, description = "Conversion timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "convert_jpeg"))]
pub async fn convert_jpeg(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>, HttpAppError> {
    convert_to_json(&state, multipart, &state.jpeg_validator).await
}

/// Convert an upload and return the AVIF file itself
#[utoipa::path(
    post,
    path = "/convert-stream",
    tag = "conversion",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `file`: a .heic, .heif, .jpg or .jpeg image"),
    responses(
        (status = 200, description = "AVIF file as an attachment", body = Vec<u8>, content_type = "image/avif"),
        (status = 400, description = "Missing file, invalid file type or empty file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
        (status = 503, description = "Conversion timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "convert_stream"))]
pub async fn convert_stream(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = multipart.map_err(multipart_rejection_to_app_error)?;
    let (file, format) = extract_upload(multipart, &state.image_validator).await?;

    let result = run_conversion(&state, file, format, VariantSet::FullOnly).await?;
    let full = result.full;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, AVIF_MIME_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&full.filename),
        )
        .header(header::CONTENT_LENGTH, full.size())
        .body(Body::from(full.data))
        .map_err(|e| HttpAppError(AppError::Internal(format!("Failed to build response: {}", e))))
}

async fn convert_to_json(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    validator: &UploadValidator,
) -> Result<Json<ConversionResponse>, HttpAppError> {
    let multipart = multipart.map_err(multipart_rejection_to_app_error)?;
    let (file, format) = extract_upload(multipart, validator).await?;
    let original_filename = file.filename.clone();

    let result = run_conversion(state, file, format, VariantSet::FullAndThumbnail).await?;

    Ok(Json(conversion_response(original_filename, result)))
}

fn conversion_response(
    original_filename: Option<String>,
    result: ConversionResult,
) -> ConversionResponse {
    ConversionResponse {
        success: true,
        original_filename,
        variants: result
            .into_variants()
            .into_iter()
            .map(variant_response)
            .collect(),
    }
}

fn variant_response(variant: ConversionVariant) -> VariantResponse {
    VariantResponse {
        variant: variant.kind,
        size: variant.size(),
        content: STANDARD.encode(&variant.data),
        filename: variant.filename,
        mimetype: AVIF_MIME_TYPE.to_string(),
    }
}

/// `attachment; filename="..."`, with characters that would break the quoted string replaced.
fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
