use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::error::LedgerError;

/// A four digit secret, kept as text so leading zeros survive.
#[derive(Clone, PartialEq, Eq, Hash, SerializeDisplay)]
pub struct Pin(String);

impl Pin {
    pub const LENGTH: usize = 4;

    pub fn new(pin: &str) -> Result<Pin, LedgerError> {
        pin.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Pin {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LENGTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidPin);
        }
        return Ok(Pin(s.to_owned()));
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin(****)")
    }
}

/// Stored pins are normally strings, but files written by older
/// console sessions hold them as bare integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPin {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Pin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pin = match RawPin::deserialize(deserializer)? {
            RawPin::Text(text) => text.parse(),
            RawPin::Number(n) if n <= 9999 => Ok(Pin(format!("{:04}", n))),
            RawPin::Number(_) => Err(LedgerError::InvalidPin),
        };
        pin.map_err(de::Error::custom)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, SerializeDisplay, DeserializeFromStr)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub const LENGTH: usize = 7;
    pub const SYMBOLS: &'static [u8] = b"@!#$%^&*";

    const LETTERS: &'static [u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const DIGITS: &'static [u8] = b"0123456789";

    /// Draws 3 letters, 3 digits and 1 symbol, then shuffles them.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> AccountNumber {
        let mut chars: Vec<char> = Vec::with_capacity(Self::LENGTH);
        for (pool, count) in [(Self::LETTERS, 3), (Self::DIGITS, 3), (Self::SYMBOLS, 1)] {
            for _ in 0..count {
                chars.push(pool[rng.gen_range(0..pool.len())] as char);
            }
        }
        chars.shuffle(rng);
        return AccountNumber(chars.into_iter().collect());
    }

    /// Whether this number has the shape `generate` produces.
    pub fn is_well_formed(&self) -> bool {
        let count = |pool: &[u8]| self.0.bytes().filter(|b| pool.contains(b)).count();
        self.0.len() == Self::LENGTH
            && count(Self::LETTERS) == 3
            && count(Self::DIGITS) == 3
            && count(Self::SYMBOLS) == 1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountNumber {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AccountNumber(s.to_owned()))
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub pin: Pin,
    pub accountno: AccountNumber,
    pub balance: u64,
}

impl Account {
    /// Exact match on both account number and pin.
    pub fn matches(&self, accountno: &str, pin: &str) -> bool {
        self.accountno.as_str() == accountno && self.pin.as_str() == pin
    }
}
