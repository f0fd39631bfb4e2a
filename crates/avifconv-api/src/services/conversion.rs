//! Runs the CPU-bound pipeline off the async runtime.

use crate::error::conversion_error_to_app_error;
use crate::state::AppState;
use avifconv_core::AppError;
use avifconv_processing::{ConversionResult, SourceFormat, UploadedFile, VariantSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Convert an upload on the blocking pool.
///
/// At most `max_concurrent_conversions` run at once; waiting for a slot counts against
/// the conversion timeout. On timeout the blocking task is told to stop; it releases
/// its slot at the next stage boundary, since a decode or encode already running is
/// not interrupted.
pub async fn run_conversion(
    state: &AppState,
    file: UploadedFile,
    format: SourceFormat,
    variants: VariantSet,
) -> Result<ConversionResult, AppError> {
    let timeout = state.config.conversion_timeout();
    let pipeline = state.pipeline.clone();
    let slots = state.conversion_slots.clone();
    let cancelled = Arc::new(AtomicBool::new(false));
    let task_cancelled = cancelled.clone();

    let work = async move {
        let permit = slots
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("Conversion pool is closed".to_string()))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.convert_cancellable(
                &file.data,
                format,
                file.filename.as_deref(),
                variants,
                &task_cancelled,
            )
        })
        .await
        .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))?
        .map_err(conversion_error_to_app_error)
    };

    match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => {
            cancelled.store(true, Ordering::Relaxed);
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Conversion exceeded its time budget"
            );
            Err(AppError::ConversionTimeout {
                seconds: timeout.as_secs(),
            })
        }
    }
}
