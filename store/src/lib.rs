//! Abstract storage traits for the Vesta incentive ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the workspace depends only on the traits. Values are
//! opaque `Vec<u8>` so the store never depends on the engine crates — the
//! engines serialize/deserialize their own types.

pub mod account;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod meta;

pub use account::AccountStore;
pub use error::StoreError;
pub use ledger::LedgerStore;
pub use memory::MemoryStore;
pub use meta::MetaStore;
