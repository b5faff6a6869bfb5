//! In-Memory Store
//!
//! A single-process implementation of every store trait, used by tests
//! and runnable demos. One mutex guards the whole state, so uniqueness
//! checks and inserts happen atomically, mirroring the constraint
//! behavior of the PostgreSQL store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::repository::{
    AccountRepository, SessionStore, StoreInsert, VerificationCodeStore,
};
use crate::error::AccountsResult;

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Account>,
    codes: HashMap<String, String>,
    sessions: HashMap<(Uuid, String), String>,
}

/// In-memory account/code/session store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked; the
        // data itself is still coherent for our single-statement ops.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of stored verification codes (test observability)
    pub fn code_count(&self) -> usize {
        self.state().codes.len()
    }
}

impl AccountRepository for MemoryStore {
    async fn insert(&self, account: &Account) -> AccountsResult<StoreInsert> {
        let mut state = self.state();

        let taken = state
            .accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email);
        if taken {
            return Ok(StoreInsert::Duplicate);
        }

        state.accounts.push(account.clone());
        Ok(StoreInsert::Inserted)
    }

    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn update(&self, account: &Account) -> AccountsResult<()> {
        let mut state = self.state();
        if let Some(existing) = state
            .accounts
            .iter_mut()
            .find(|a| a.account_id == account.account_id)
        {
            *existing = account.clone();
        }
        Ok(())
    }
}

impl VerificationCodeStore for MemoryStore {
    async fn insert_code(&self, email: &str, code_hash: &str) -> AccountsResult<StoreInsert> {
        let mut state = self.state();
        if state.codes.contains_key(email) {
            return Ok(StoreInsert::Duplicate);
        }
        state.codes.insert(email.to_string(), code_hash.to_string());
        Ok(StoreInsert::Inserted)
    }

    async fn find_code(&self, email: &str) -> AccountsResult<Option<String>> {
        Ok(self.state().codes.get(email).cloned())
    }

    async fn delete_code(&self, email: &str) -> AccountsResult<bool> {
        Ok(self.state().codes.remove(email).is_some())
    }
}

impl SessionStore for MemoryStore {
    async fn get(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>> {
        Ok(self
            .state()
            .sessions
            .get(&(session_id, key.to_string()))
            .cloned())
    }

    async fn put(&self, session_id: Uuid, key: &str, value: &str) -> AccountsResult<()> {
        self.state()
            .sessions
            .insert((session_id, key.to_string()), value.to_string());
        Ok(())
    }

    async fn take(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>> {
        Ok(self.state().sessions.remove(&(session_id, key.to_string())))
    }

    async fn remove(&self, session_id: Uuid, key: &str) -> AccountsResult<()> {
        self.state().sessions.remove(&(session_id, key.to_string()));
        Ok(())
    }

    async fn destroy(&self, session_id: Uuid) -> AccountsResult<()> {
        self.state().sessions.retain(|(sid, _), _| *sid != session_id);
        Ok(())
    }
}
