use axum::{
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use avifconv_core::AppError;
use avifconv_processing::ValidationError;

use crate::error::HttpAppError;

/// Allowance for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body limits derived from the maximum upload size
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit {
    pub max_file_size: usize,
}

impl BodyLimit {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Largest request body accepted.
    pub fn max_request_size(&self) -> usize {
        self.max_file_size + MULTIPART_OVERHEAD_BYTES
    }
}

/// Reject a request whose `Content-Length` already exceeds the body limit, before any
/// of the body is read.
pub async fn content_length_guard(
    State(limit): State<BodyLimit>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if let Some(size) = declared {
        if size > limit.max_request_size() as u64 {
            tracing::debug!(
                content_length = size,
                max = limit.max_request_size(),
                "Rejecting oversized request"
            );
            let message = ValidationError::FileTooLarge {
                size,
                max: limit.max_file_size,
            }
            .to_string();
            return HttpAppError(AppError::PayloadTooLarge(message)).into_response();
        }
    }

    next.run(request).await
}
