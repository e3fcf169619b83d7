use bincode::deserialize;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::de::DeserializeOwned;

use crate::metadata::ListResponse;
use crate::metadata::ResponseMetadata;
use crate::Result;

pub fn make_data_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/data/"].concat()
}

pub fn make_data_value_key(ns: &[u8], key: &str) -> Vec<u8> {
    [ns, b"/data/", key.as_bytes()].concat()
}

pub fn list<T>(tx: &Transaction<TransactionDB>, ns: &[u8]) -> Result<ListResponse<T>>
where T: DeserializeOwned {
    let prefix = make_data_key(ns);

    let mut data = Vec::new();
    for kv in tx.prefix_iterator(&prefix) {
        let (key, value) = kv?;
        if !key.starts_with(&prefix) {
            break;
        }
        data.push(deserialize(&value)?);
    }

    Ok(ListResponse {
        data,
        meta: ResponseMetadata { next: None },
    })
}
