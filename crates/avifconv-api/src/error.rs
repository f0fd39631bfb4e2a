//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Library errors (`ValidationError`,
//! `ConversionError`) and multipart failures are mapped into `AppError` here so every
//! failure renders the same JSON shape.

use avifconv_core::{AppError, ErrorMetadata, LogLevel};
use avifconv_processing::{ConversionError, ValidationError};
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[schema(example = "Invalid file type. Allowed: .heic, .heif, .jpg, .jpeg")]
    pub detail: String,
    /// Machine-readable error code for programmatic handling
    #[schema(example = "INVALID_FILE_TYPE")]
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from avifconv-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(validation_error_to_app_error(err))
    }
}

impl From<ConversionError> for HttpAppError {
    fn from(err: ConversionError) -> Self {
        HttpAppError(conversion_error_to_app_error(err))
    }
}

pub fn validation_error_to_app_error(err: ValidationError) -> AppError {
    match err {
        ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
        ValidationError::InvalidExtension { .. } => AppError::InvalidFileType(err.to_string()),
        ValidationError::MissingFilename | ValidationError::EmptyFile => {
            AppError::InvalidInput(err.to_string())
        }
    }
}

/// Decode-side and encode-side failures both surface as 500 `Conversion failed: ...`.
pub fn conversion_error_to_app_error(err: ConversionError) -> AppError {
    match err {
        ConversionError::Cancelled => AppError::Internal(err.to_string()),
        err if err.is_input_error() => AppError::DecodeFailed(err.to_string()),
        err => AppError::EncodeFailed(err.to_string()),
    }
}

/// A multipart stream that breaks mid-read; body-limit hits become 413.
pub fn multipart_error_to_app_error(err: MultipartError, max_file_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(
            ValidationError::FileTooLarge {
                size: 0,
                max: max_file_size,
            }
            .to_string(),
        )
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// A request that is not `multipart/form-data` at all.
pub fn multipart_rejection_to_app_error(rejection: MultipartRejection) -> AppError {
    AppError::InvalidInput(format!("Invalid multipart request: {}", rejection.body_text()))
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            detail: app_error.client_message(),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}
