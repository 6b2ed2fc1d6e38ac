pub mod core;
pub mod backend;
pub mod config;
pub mod logging;

pub use crate::core::{Account, AccountNumber, Amount, Ledger, LedgerError, LedgerResult, Pin};
pub use crate::core::{account, ledger};
pub use crate::backend::{AccountStore, BackendError, JsonStore};
pub use crate::config::AppConfig;
