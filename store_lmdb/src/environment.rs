//! LMDB environment setup.

use crate::error::LmdbError;
use crate::{LmdbAccountStore, LmdbLedgerStore, LmdbMetaStore};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

const RPS_DB: &str = "rps_sequences";
const ACCOUNTS_DB: &str = "stake_accounts";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    rps_db: Database<Bytes, Bytes>,
    accounts_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        // Safety contract of heed: no other process may hold this
        // environment open with incompatible flags.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(8)
                .map_size(map_size)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let rps_db = env.create_database(&mut wtxn, Some(RPS_DB))?;
        let accounts_db = env.create_database(&mut wtxn, Some(ACCOUNTS_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;
        tracing::info!(path = %path.display(), "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            rps_db,
            accounts_db,
            meta_db,
        })
    }

    pub fn ledger_store(&self) -> LmdbLedgerStore {
        LmdbLedgerStore::new(self.env.clone(), self.rps_db)
    }

    pub fn account_store(&self) -> LmdbAccountStore {
        LmdbAccountStore::new(self.env.clone(), self.accounts_db)
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore::new(self.env.clone(), self.meta_db)
    }
}
