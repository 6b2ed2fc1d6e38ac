use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::Account;

/// Where a `Ledger` keeps its collection between runs.
/// Every `save` replaces the whole stored collection.
pub trait AccountStore {
    fn load(&self) -> Result<Vec<Account>>;
    fn save(&self, accounts: &[Account]) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed accounts file {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, BackendError>;
