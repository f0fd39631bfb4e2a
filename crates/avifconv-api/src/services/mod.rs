pub mod conversion;

pub use conversion::run_conversion;
