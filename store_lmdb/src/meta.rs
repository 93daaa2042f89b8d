//! LMDB implementation of `MetaStore`.

use heed::types::Bytes;
use heed::{Database, Env};
use std::sync::Arc;
use vesta_store::{MetaStore, StoreError};

pub struct LmdbMetaStore {
    env: Arc<Env>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbMetaStore {
    pub fn new(env: Arc<Env>, meta_db: Database<Bytes, Bytes>) -> Self {
        Self { env, meta_db }
    }
}

impl MetaStore for LmdbMetaStore {
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match self.meta_db.get(&txn, key) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.meta_db
            .put(&mut txn, key, value)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.meta_db
            .delete(&mut txn, key)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
