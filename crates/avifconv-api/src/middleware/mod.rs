//! API-specific HTTP middleware

pub mod body_limit;

pub use body_limit::{content_length_guard, BodyLimit};
