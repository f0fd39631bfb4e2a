//! HTTP layer of the HEIC/JPEG to AVIF converter.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;

pub use state::AppState;
