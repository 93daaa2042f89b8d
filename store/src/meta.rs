use crate::StoreError;

/// Store trait for engine-level metadata (counters, schema version).
pub trait MetaStore {
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete_meta(&self, key: &[u8]) -> Result<(), StoreError>;
}
