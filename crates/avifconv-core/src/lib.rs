//! avifconv Core Library
//!
//! This crate provides the configuration, error types and wire models shared by the
//! processing and API crates of the AVIF conversion service.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::VariantKind;
