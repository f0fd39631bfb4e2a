//! Application setup and initialization

pub mod routes;
pub mod self_check;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use avifconv_core::Config;
use avifconv_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    avifconv_infra::init_telemetry(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.environment,
        LogFormat::parse(&config.log_format),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    // Refuse to start when the encoder cannot produce AVIF on this host
    self_check::verify_codec(&config)
        .await
        .context("Codec self-check failed")?;

    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
