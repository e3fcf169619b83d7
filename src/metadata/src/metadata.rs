use std::sync::Arc;

use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::strategies;
use crate::Result;

pub struct MetadataProvider {
    pub strategies: Arc<dyn strategies::Provider>,
}

impl MetadataProvider {
    pub fn try_new(db: Arc<TransactionDB>) -> Result<Self> {
        Ok(MetadataProvider {
            strategies: Arc::new(strategies::ProviderImpl::new(db)),
        })
    }

    pub fn new_memory() -> Self {
        MetadataProvider {
            strategies: Arc::new(strategies::MemoryProvider::new()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}
