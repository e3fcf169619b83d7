use std::result;

use common::error::CommonError;
use metadata::error::MetadataError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("BadRequest: {0}")]
    BadRequest(String),
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("Config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("Common: {0:?}")]
    Common(#[from] CommonError),
    #[error("Metadata: {0:?}")]
    Metadata(#[from] MetadataError),
    #[error("Serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
}
