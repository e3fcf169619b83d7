pub mod config;
pub mod error;
pub mod funnel;

pub use error::Result;

pub const PERCENT: f64 = 100.0;

pub const DATA_PATH_METADATA: &str = "md";
