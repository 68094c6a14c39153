// Store module - ledger and user storage seams

pub mod memory;
pub mod seed;

use anyhow::Result;

use crate::db::{AccountId, NewUser, Transaction, User};

pub use memory::MemoryStore;

/// Append-only transaction log, partitioned by account.
///
/// Implementations assign ids on append and return transactions in append
/// order from `list_all`. Nothing is ever updated or deleted.
pub trait Ledger: Send + Sync {
    /// Record a transaction and return its assigned id
    fn append(&self, account_id: AccountId, tx: &Transaction) -> Result<i64>;

    /// Every transaction of the account, oldest append first
    fn list_all(&self, account_id: AccountId) -> Result<Vec<Transaction>>;
}

/// Registered users
pub trait UserStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Insert a user, assigning the next sequential id
    fn insert(&self, user: NewUser) -> Result<User>;
}
