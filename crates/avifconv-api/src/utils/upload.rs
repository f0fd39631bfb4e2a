//! Multipart upload extraction

use crate::error::{multipart_error_to_app_error, validation_error_to_app_error};
use avifconv_core::AppError;
use avifconv_processing::{SourceFormat, UploadValidator, UploadedFile};
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use axum::http::header::CONTENT_LENGTH;
use bytes::BytesMut;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Extract and validate the `file` field of a multipart form.
///
/// Only one field named "file" is accepted. The filename is validated before any of
/// the part's bytes are read, and the body is streamed so an oversized upload is
/// abandoned as soon as it crosses the limit.
pub async fn extract_upload(
    mut multipart: Multipart,
    validator: &UploadValidator,
) -> Result<(UploadedFile, SourceFormat), AppError> {
    let mut upload: Option<(UploadedFile, SourceFormat)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error_to_app_error(e, validator.max_file_size()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if upload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let declared_size = declared_part_size(&field);

        let format = validator
            .validate_filename(filename.as_deref())
            .map_err(validation_error_to_app_error)?;
        validator
            .validate_declared_size(declared_size)
            .map_err(validation_error_to_app_error)?;

        let data = read_limited(field, validator).await?;

        let file = UploadedFile::new(filename, content_type, data.freeze())
            .with_declared_size(declared_size);
        upload = Some((file, format));
    }

    let (file, format) =
        upload.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    validator
        .validate_file_size(file.size())
        .map_err(validation_error_to_app_error)?;

    tracing::debug!(
        filename = ?file.filename,
        content_type = ?file.content_type,
        size = file.size(),
        format = %format,
        "Upload received"
    );

    Ok((file, format))
}

fn declared_part_size(field: &Field<'_>) -> Option<u64> {
    field
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

async fn read_limited(
    mut field: Field<'_>,
    validator: &UploadValidator,
) -> Result<BytesMut, AppError> {
    let max = validator.max_file_size();
    let mut data = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error_to_app_error(e, max))?
    {
        if data.len() + chunk.len() > max {
            return Err(validation_error_to_app_error(
                avifconv_processing::ValidationError::FileTooLarge {
                    size: (data.len() + chunk.len()) as u64,
                    max,
                },
            ));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
