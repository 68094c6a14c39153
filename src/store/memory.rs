use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::RwLock;

use super::{Ledger, UserStore};
use crate::db::{AccountId, NewUser, Transaction, User};

#[derive(Debug, Default)]
struct LedgerState {
    next_id: i64,
    accounts: HashMap<AccountId, Vec<Transaction>>,
}

/// Process-lifetime store used for demos and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RwLock<LedgerState>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryStore {
    fn append(&self, account_id: AccountId, tx: &Transaction) -> Result<i64> {
        let mut state = self
            .ledger
            .write()
            .map_err(|_| anyhow!("ledger lock poisoned"))?;
        state.next_id += 1;
        let id = state.next_id;

        let mut stored = tx.clone();
        stored.id = Some(id);
        state.accounts.entry(account_id).or_default().push(stored);

        Ok(id)
    }

    fn list_all(&self, account_id: AccountId) -> Result<Vec<Transaction>> {
        let state = self
            .ledger
            .read()
            .map_err(|_| anyhow!("ledger lock poisoned"))?;
        Ok(state.accounts.get(&account_id).cloned().unwrap_or_default())
    }
}

impl UserStore for MemoryStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().map_err(|_| anyhow!("user lock poisoned"))?;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.read().map_err(|_| anyhow!("user lock poisoned"))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn insert(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().map_err(|_| anyhow!("user lock poisoned"))?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            anyhow::bail!("email {} already registered", user.email);
        }

        let created = User {
            id: users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(created.clone());
        Ok(created)
    }
}
