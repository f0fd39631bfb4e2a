//! Configuration module
//!
//! The service configuration is built once at startup and shared read-only afterwards.
//! Conversion settings (upload limit, AVIF quality and speed, thumbnail bound, accepted
//! extensions) are fixed; only operator settings such as the listening port can be
//! changed through the environment.

use std::env;
use std::time::Duration;

/// Maximum accepted upload size: 50 MiB.
pub const MAX_FILE_SIZE_BYTES: usize = 50 * 1024 * 1024;
/// AVIF encoder quality (1-100) used for every variant.
pub const AVIF_QUALITY: u8 = 80;
/// AVIF encoder speed (1-10), midpoint between encode time and compression.
pub const AVIF_SPEED: u8 = 6;
/// Longest side of the thumbnail variant, in pixels.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 300;
/// Extensions accepted by the generic conversion endpoints.
pub const IMAGE_EXTENSIONS: &[&str] = &["heic", "heif", "jpg", "jpeg"];
/// Extensions accepted by the JPEG-only endpoint.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
/// Human-readable list of accepted input formats, reported by the service descriptor.
pub const SUPPORTED_FORMATS: &[&str] = &["HEIC", "HEIF", "JPEG", "JPG"];

const SERVER_PORT: u16 = 3002;
const CONVERSION_TIMEOUT_SECS: u64 = 120;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

#[derive(Clone, Debug)]
pub struct Config {
    // Conversion settings
    pub max_file_size_bytes: usize,
    pub avif_quality: u8,
    pub avif_speed: u8,
    pub thumbnail_max_dimension: u32,
    pub allowed_extensions: Vec<String>,
    pub jpeg_allowed_extensions: Vec<String>,
    // Operator settings
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// `compact` (default) or `json`.
    pub log_format: String,
    pub conversion_timeout_secs: u64,
    /// Number of conversions allowed to run on the blocking pool at once.
    pub max_concurrent_conversions: usize,
    pub http_concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            avif_quality: AVIF_QUALITY,
            avif_speed: AVIF_SPEED,
            thumbnail_max_dimension: THUMBNAIL_MAX_DIMENSION,
            allowed_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            jpeg_allowed_extensions: JPEG_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            log_format: "compact".to_string(),
            conversion_timeout_secs: CONVERSION_TIMEOUT_SECS,
            max_concurrent_conversions: default_conversion_concurrency(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

fn default_conversion_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Config {
    /// Load configuration from the process environment (and an optional `.env` file).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid port number"))?,
            None => defaults.server_port,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let config = Self {
            server_port,
            cors_origins,
            environment,
            log_format: lookup("LOG_FORMAT").unwrap_or(defaults.log_format),
            conversion_timeout_secs: lookup("CONVERSION_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.conversion_timeout_secs),
            max_concurrent_conversions: lookup("MAX_CONCURRENT_CONVERSIONS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_concurrent_conversions),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.http_concurrency_limit),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("Maximum file size cannot be 0"));
        }

        if !(1..=100).contains(&self.avif_quality) {
            return Err(anyhow::anyhow!(
                "AVIF quality must be between 1 and 100, got {}",
                self.avif_quality
            ));
        }

        if !(1..=10).contains(&self.avif_speed) {
            return Err(anyhow::anyhow!(
                "AVIF speed must be between 1 and 10, got {}",
                self.avif_speed
            ));
        }

        if self.thumbnail_max_dimension == 0 {
            return Err(anyhow::anyhow!("Thumbnail bound cannot be 0"));
        }

        if self.conversion_timeout_secs == 0 {
            return Err(anyhow::anyhow!("CONVERSION_TIMEOUT_SECS cannot be 0"));
        }

        if self.max_concurrent_conversions == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_CONVERSIONS cannot be 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size_bytes / 1024 / 1024
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion_timeout_secs)
    }
}
