//! Sign In Use Case
//!
//! Authenticates credentials and reads the account state off the
//! matched record. Deliberately side-effect free: issuing a
//! verification code for an unverified account is the caller's reaction
//! to the outcome, not something this use case does.

use std::sync::Arc;

use platform::sanitize::escape_html;
use platform::secret::ClearTextSecret;

use crate::domain::credential_rules;
use crate::domain::outcome::Outcome;
use crate::domain::repository::AccountRepository;
use crate::error::AccountsResult;

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountsResult<Outcome> {
        if let Err(violation) = credential_rules::validate_login(&input.username, &input.password)
        {
            return Ok(Outcome::InputInvalid(violation));
        }

        // Escape before the record ever sees the values; stored and
        // compared forms stay consistent with what registration stored.
        let username = escape_html(&input.username);
        let password = escape_html(&input.password);

        let Some(account) = self.accounts.find_by_username(&username).await? else {
            tracing::warn!("Failed sign-in attempt");
            return Ok(Outcome::AuthenticationFailed);
        };

        let supplied = ClearTextSecret::new(password);
        if !account.password_hash.verify(&supplied) {
            // Same outcome as an unknown username so responses cannot be
            // used to probe which usernames exist.
            tracing::warn!("Failed sign-in attempt");
            return Ok(Outcome::AuthenticationFailed);
        }

        if account.deleted {
            tracing::info!(username = %account.username, "Sign-in attempt on closed account");
            return Ok(Outcome::AccountDeleted);
        }

        if !account.active {
            return Ok(Outcome::AccountUnverified {
                email: account.email,
            });
        }

        tracing::info!(username = %account.username, "Signed in");

        Ok(Outcome::Authenticated {
            username: account.username,
        })
    }
}
