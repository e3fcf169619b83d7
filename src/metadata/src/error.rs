use std::result;
use std::sync::PoisonError;

use thiserror::Error;

pub type Result<T> = result::Result<T, MetadataError>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("not found {0:?}")]
    NotFound(String),
    #[error("bad request {0:?}")]
    BadRequest(String),
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("rocksdb {0:?}")]
    RocksDb(#[from] rocksdb::Error),
    #[error("bincode {0:?}")]
    Bincode(#[from] bincode::Error),
}

impl<T> From<PoisonError<T>> for MetadataError {
    fn from(err: PoisonError<T>) -> Self {
        MetadataError::Internal(err.to_string())
    }
}
