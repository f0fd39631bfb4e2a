pub mod convert;
pub mod service;
