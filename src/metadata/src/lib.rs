pub mod error;
pub mod framework;
pub mod metadata;
pub mod rocksdb;
pub mod store;
pub mod strategies;
pub mod templates;

pub use error::Result;

pub use crate::metadata::MetadataProvider;
