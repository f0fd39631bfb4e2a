use avifconv_core::Config;
use avifconv_processing::{ConversionPipeline, ConversionSettings, UploadValidator};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared, read-only application state
pub struct AppState {
    pub config: Config,
    pub pipeline: ConversionPipeline,
    /// Upload rules of `/convert` and `/convert-stream`
    pub image_validator: UploadValidator,
    /// Upload rules of `/convert-jpeg`
    pub jpeg_validator: UploadValidator,
    /// Permits for conversions running on the blocking pool
    pub conversion_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            pipeline: ConversionPipeline::new(ConversionSettings::from_config(&config)),
            image_validator: UploadValidator::for_images(&config),
            jpeg_validator: UploadValidator::for_jpeg(&config),
            conversion_slots: Arc::new(Semaphore::new(config.max_concurrent_conversions)),
            config,
        }
    }
}
