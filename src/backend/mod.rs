mod json_store;
mod interface;

pub use interface::{AccountStore, Result, BackendError};
pub use json_store::JsonStore;
