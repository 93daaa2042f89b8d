//! LMDB storage backend for the Vesta incentive ledger.
//!
//! Implements the storage traits from `vesta-store` using the `heed` LMDB
//! bindings. Each logical store maps to one database within a single
//! environment; every call opens its own transaction and commits before
//! returning, matching the core's all-or-nothing call semantics.

pub mod account;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod meta;

pub use account::LmdbAccountStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedgerStore;
pub use meta::LmdbMetaStore;
