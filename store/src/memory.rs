//! In-memory store — thread-safe storage for testing and tooling.

use crate::account::AccountStore;
use crate::ledger::LedgerStore;
use crate::meta::MetaStore;
use crate::StoreError;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory implementation of every store trait.
///
/// Keys are held in `BTreeMap`s so iteration order is deterministic,
/// matching what the LMDB backend produces.
pub struct MemoryStore {
    sequences: Mutex<BTreeMap<String, Vec<u8>>>,
    accounts: Mutex<BTreeMap<String, Vec<u8>>>,
    meta: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sequences: Mutex::new(BTreeMap::new()),
            accounts: Mutex::new(BTreeMap::new()),
            meta: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn get_sequence(&self, validator: &vesta_types::Address) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .sequences
            .lock()
            .unwrap()
            .get(validator.as_str())
            .cloned())
    }

    fn put_sequence(
        &self,
        validator: &vesta_types::Address,
        sequence: &[u8],
    ) -> Result<(), StoreError> {
        self.sequences
            .lock()
            .unwrap()
            .insert(validator.as_str().to_string(), sequence.to_vec());
        Ok(())
    }

    fn iter_sequences(&self) -> Result<Vec<(vesta_types::Address, Vec<u8>)>, StoreError> {
        Ok(self
            .sequences
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (vesta_types::Address::new(k.clone()), v.clone()))
            .collect())
    }
}

impl AccountStore for MemoryStore {
    fn get_account(&self, identity: &vesta_types::Address) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(identity.as_str()).cloned())
    }

    fn put_account(
        &self,
        identity: &vesta_types::Address,
        account: &[u8],
    ) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(identity.as_str().to_string(), account.to_vec());
        Ok(())
    }

    fn delete_account(&self, identity: &vesta_types::Address) -> Result<(), StoreError> {
        self.accounts.lock().unwrap().remove(identity.as_str());
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(vesta_types::Address, Vec<u8>)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (vesta_types::Address::new(k.clone()), v.clone()))
            .collect())
    }
}

impl MetaStore for MemoryStore {
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError> {
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_types::Address;

    #[test]
    fn sequence_roundtrip() {
        let store = MemoryStore::new();
        let v = Address::new("vst_validator1");
        assert!(store.get_sequence(&v).unwrap().is_none());
        store.put_sequence(&v, b"abc").unwrap();
        assert_eq!(store.get_sequence(&v).unwrap().unwrap(), b"abc");
    }

    #[test]
    fn account_delete_removes_entry() {
        let store = MemoryStore::new();
        let id = Address::new("vst_delegator1");
        store.put_account(&id, b"state").unwrap();
        store.delete_account(&id).unwrap();
        assert!(store.get_account(&id).unwrap().is_none());
    }

    #[test]
    fn iteration_is_sorted_by_key() {
        let store = MemoryStore::new();
        store.put_account(&Address::new("vst_b"), b"2").unwrap();
        store.put_account(&Address::new("vst_a"), b"1").unwrap();
        let ids: Vec<String> = store
            .iter_accounts()
            .unwrap()
            .into_iter()
            .map(|(a, _)| a.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["vst_a", "vst_b"]);
    }
}
