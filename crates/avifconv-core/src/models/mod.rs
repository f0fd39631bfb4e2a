//! Wire models for the HTTP API
//!
//! Each sub-module represents one group of endpoints.

mod conversion;
mod service;

pub use conversion::*;
pub use service::*;
