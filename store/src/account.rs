use crate::StoreError;
use vesta_types::Address;

/// Store trait for per-identity stake accounts (position tuple, balance
/// records, claimed-through marker).
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on `vesta-vesting`
/// (which would create a circular dependency); the vesting engine
/// serializes/deserializes its own account type.
pub trait AccountStore {
    fn get_account(&self, identity: &Address) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_account(&self, identity: &Address, account: &[u8]) -> Result<(), StoreError>;
    fn delete_account(&self, identity: &Address) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;
}
