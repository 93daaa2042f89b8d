use crate::StoreError;
use vesta_types::Address;

/// Store trait for per-validator RPS checkpoint sequences.
///
/// Sequences are append-only; the engine serializes the whole sequence and
/// overwrites the validator's entry on append. No compaction, ever —
/// matured positions must stay reconstructible from any historical epoch.
pub trait LedgerStore {
    fn get_sequence(&self, validator: &Address) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_sequence(&self, validator: &Address, sequence: &[u8]) -> Result<(), StoreError>;
    fn iter_sequences(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;
}
