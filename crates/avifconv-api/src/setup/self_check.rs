//! Startup codec self-check

use anyhow::{Context, Result};
use avifconv_core::Config;
use avifconv_processing::AvifEncoder;

/// Encode a synthetic 100x100 red image with the configured quality and speed.
///
/// Runs on the blocking pool; returns the size of the produced AVIF file.
pub async fn verify_codec(config: &Config) -> Result<usize> {
    let encoder = AvifEncoder::new(config.avif_quality, config.avif_speed);

    let size = tokio::task::spawn_blocking(move || encoder.self_test())
        .await
        .context("Self-check task failed")??;

    tracing::info!(
        avif_bytes = size,
        quality = encoder.quality(),
        speed = encoder.speed(),
        "AVIF encoder self-check passed"
    );

    Ok(size)
}
