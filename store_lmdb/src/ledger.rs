//! LMDB implementation of `LedgerStore`.

use heed::types::Bytes;
use heed::{Database, Env};
use std::sync::Arc;
use vesta_store::{LedgerStore, StoreError};
use vesta_types::Address;

pub struct LmdbLedgerStore {
    env: Arc<Env>,
    rps_db: Database<Bytes, Bytes>,
}

impl LmdbLedgerStore {
    pub fn new(env: Arc<Env>, rps_db: Database<Bytes, Bytes>) -> Self {
        Self { env, rps_db }
    }
}

impl LedgerStore for LmdbLedgerStore {
    fn get_sequence(&self, validator: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match self.rps_db.get(&txn, validator.as_str().as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn put_sequence(&self, validator: &Address, sequence: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.rps_db
            .put(&mut txn, validator.as_str().as_bytes(), sequence)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn iter_sequences(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut results = Vec::new();
        let iter = self
            .rps_db
            .iter(&txn)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        for item in iter {
            let (key, val) = item.map_err(|e| StoreError::Backend(e.to_string()))?;
            let addr_str =
                std::str::from_utf8(key).map_err(|e| StoreError::Corruption(e.to_string()))?;
            results.push((Address::new(addr_str.to_string()), val.to_vec()));
        }
        Ok(results)
    }
}
