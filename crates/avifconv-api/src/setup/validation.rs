//! Configuration validation
//!
//! Validates configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use avifconv_core::Config;
use avifconv_processing::image::{HeifDecoder, ImageDecoder};

/// Validate configuration, warning about settings that work but are likely unintended.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if config.max_concurrent_conversions > cpus * 2 {
        tracing::warn!(
            max_concurrent_conversions = config.max_concurrent_conversions,
            cpus,
            "More concurrent conversions than CPUs can serve; requests will mostly queue"
        );
    }

    if !HeifDecoder.is_available() {
        tracing::warn!("Built without the `heic` feature: HEIC/HEIF uploads are not accepted");
    }

    Ok(())
}
