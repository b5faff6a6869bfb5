//! Close Account Use Case
//!
//! Soft-deletes an account: the record and its unique username/email
//! claims stay in place, but sign-in is permanently refused.

use std::sync::Arc;

use crate::domain::outcome::Outcome;
use crate::domain::repository::AccountRepository;
use crate::error::{AccountsError, AccountsResult};

/// Close account use case
pub struct CloseAccountUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> CloseAccountUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, username: &str) -> AccountsResult<Outcome> {
        let Some(mut account) = self.accounts.find_by_username(username).await? else {
            // The username came from a logged-in session; a miss here is
            // an integrity problem, not user error.
            return Err(AccountsError::AccountMissing(
                "session username has no account".to_string(),
            ));
        };

        account.close();
        self.accounts.update(&account).await?;

        tracing::info!(username = %account.username, "Account closed");

        Ok(Outcome::AccountClosed)
    }
}
