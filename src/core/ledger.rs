use log::{info, warn};
use rand::Rng;

use crate::backend::AccountStore;
use crate::core::account::{Account, AccountNumber, Pin};
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::Amount;

/// The in-memory collection of accounts, mirrored to `store`
/// after every successful mutation.
pub struct Ledger<S: AccountStore> {
    store: S,
    accounts: Vec<Account>,
}

impl<S: AccountStore> Ledger<S> {
    pub const MINIMUM_AGE: u32 = 18;
    pub const MAX_DEPOSIT: Amount = 10_000;
    const GENERATION_ATTEMPTS: usize = 32;

    /// Loads the collection from `store`. An unreadable or malformed
    /// store is reported and replaced by an empty collection.
    pub fn open(store: S) -> Ledger<S> {
        let accounts = match store.load() {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!("starting with an empty ledger: {}", err);
                Vec::new()
            }
        };
        return Ledger { store, accounts };
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_account(&mut self, name: &str, age: u32, email: &str, pin: &str) -> LedgerResult<Account> {
        if age < Self::MINIMUM_AGE {
            return Err(LedgerError::AgeTooLow { age, minimum: Self::MINIMUM_AGE });
        }
        let pin = Pin::new(pin)?;
        if name.is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(LedgerError::MissingField("email"));
        }

        let account = Account {
            name: name.to_owned(),
            age,
            email: email.to_owned(),
            pin,
            accountno: self.unused_account_number(&mut rand::thread_rng())?,
            balance: 0,
        };

        let created = account.clone();
        self.commit(move |accounts| accounts.push(account))?;
        info!("created account {}", created.accountno);
        return Ok(created);
    }

    pub fn find_account(&self, accountno: &str, pin: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.matches(accountno, pin))
    }

    pub fn deposit(&mut self, accountno: &str, pin: &str, amount: Amount) -> LedgerResult<Account> {
        let index = self.position(accountno, pin)?;
        if amount <= 0 || amount > Self::MAX_DEPOSIT {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let balance = self.accounts[index].balance
            .checked_add(amount as u64)
            .ok_or(LedgerError::InvalidAmount(amount))?;

        self.commit(|accounts| {
            accounts[index].balance = balance;
            accounts[index].clone()
        })
    }

    pub fn withdraw(&mut self, accountno: &str, pin: &str, amount: Amount) -> LedgerResult<Account> {
        let index = self.position(accountno, pin)?;
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let available = self.accounts[index].balance;
        if amount as u64 > available {
            return Err(LedgerError::InsufficientFunds { requested: amount, available });
        }

        self.commit(|accounts| {
            accounts[index].balance = available - amount as u64;
            accounts[index].clone()
        })
    }

    /// Empty or omitted fields keep their current value.
    pub fn update_details(
        &mut self,
        accountno: &str,
        pin: &str,
        new_name: Option<&str>,
        new_email: Option<&str>,
        new_pin: Option<&str>,
    ) -> LedgerResult<Account> {
        let index = self.position(accountno, pin)?;
        let new_pin = match supplied(new_pin) {
            Some(pin) => Some(Pin::new(pin)?),
            None => None,
        };

        self.commit(|accounts| {
            let account = &mut accounts[index];
            if let Some(name) = supplied(new_name) {
                account.name = name.to_owned();
            }
            if let Some(email) = supplied(new_email) {
                account.email = email.to_owned();
            }
            if let Some(pin) = new_pin {
                account.pin = pin;
            }
            account.clone()
        })
    }

    /// Returns the removed record.
    pub fn delete_account(&mut self, accountno: &str, pin: &str, confirmed: bool) -> LedgerResult<Account> {
        let index = self.position(accountno, pin)?;
        if !confirmed {
            return Err(LedgerError::NotConfirmed);
        }

        let removed = self.commit(|accounts| accounts.remove(index))?;
        info!("deleted account {}", removed.accountno);
        return Ok(removed);
    }

    fn position(&self, accountno: &str, pin: &str) -> LedgerResult<usize> {
        self.accounts.iter()
            .position(|account| account.matches(accountno, pin))
            .ok_or(LedgerError::AccountNotFound)
    }

    fn unused_account_number<R: Rng + ?Sized>(&self, rng: &mut R) -> LedgerResult<AccountNumber> {
        for _ in 0..Self::GENERATION_ATTEMPTS {
            let candidate = AccountNumber::generate(rng);
            if !self.accounts.iter().any(|account| account.accountno == candidate) {
                return Ok(candidate);
            }
        }
        return Err(LedgerError::AccountNumberExhausted);
    }

    /// Applies `change` to a copy of the collection and swaps the copy in
    /// only once it has been written out.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Vec<Account>) -> T) -> LedgerResult<T> {
        let mut next = self.accounts.clone();
        let result = change(&mut next);
        self.store.save(&next)?;
        self.accounts = next;
        return Ok(result);
    }
}

fn supplied(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}
