pub mod account;
pub mod error;
pub mod ledger;

/// Signed so that zero and negative requests can be told apart and rejected.
pub type Amount = i64;

pub use account::{Account, AccountNumber, Pin};
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
