//! LMDB implementation of `AccountStore`.

use heed::types::Bytes;
use heed::{Database, Env};
use std::sync::Arc;
use vesta_store::{AccountStore, StoreError};
use vesta_types::Address;

pub struct LmdbAccountStore {
    env: Arc<Env>,
    accounts_db: Database<Bytes, Bytes>,
}

impl LmdbAccountStore {
    pub fn new(env: Arc<Env>, accounts_db: Database<Bytes, Bytes>) -> Self {
        Self { env, accounts_db }
    }
}

impl AccountStore for LmdbAccountStore {
    fn get_account(&self, identity: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match self.accounts_db.get(&txn, identity.as_str().as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn put_account(&self, identity: &Address, account: &[u8]) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.accounts_db
            .put(&mut txn, identity.as_str().as_bytes(), account)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn delete_account(&self, identity: &Address) -> Result<(), StoreError> {
        let mut txn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.accounts_db
            .delete(&mut txn, identity.as_str().as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        let txn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut results = Vec::new();
        let iter = self
            .accounts_db
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
