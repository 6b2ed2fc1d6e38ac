use thiserror::Error;

use crate::backend::BackendError;
use crate::core::Amount;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Occurs when an account holder is younger than
    /// `Ledger::MINIMUM_AGE` at creation time.
    #[error("account holder must be at least {minimum}, got {age}")]
    AgeTooLow { age: u32, minimum: u32 },

    /// Occurs when a pin is not exactly four digit characters.
    #[error("pin must be exactly 4 digits")]
    InvalidPin,

    /// Occurs when a required text field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No record matches both the account number and the pin.
    #[error("no account matches that account number and pin")]
    AccountNotFound,

    #[error("invalid amount: {0}")]
    InvalidAmount(Amount),

    #[error("insufficient funds: asked {requested} while {available} available")]
    InsufficientFunds { requested: Amount, available: u64 },

    #[error("deletion was not confirmed")]
    NotConfirmed,

    /// Occurs when no unused account number turned up
    /// within `Ledger::GENERATION_ATTEMPTS` draws.
    #[error("could not generate an unused account number")]
    AccountNumberExhausted,

    #[error("failed to persist accounts: {0}")]
    Persistence(#[from] BackendError),
}

impl LedgerError {
    /// Stable, machine readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AgeTooLow { .. } => "AgeTooLow",
            Self::InvalidPin => "InvalidPin",
            Self::MissingField(_) => "MissingField",
            Self::AccountNotFound => "AccountNotFound",
            Self::InvalidAmount(_) => "InvalidAmount",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::NotConfirmed => "NotConfirmed",
            Self::AccountNumberExhausted => "AccountNumberExhausted",
            Self::Persistence(_) => "PersistenceError",
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
