//! Sign Up Use Case
//!
//! Creates a new, not-yet-verified account.

use std::sync::Arc;

use platform::sanitize::escape_html;
use platform::secret::ClearTextSecret;

use crate::domain::account::Account;
use crate::domain::credential_rules;
use crate::domain::outcome::Outcome;
use crate::domain::repository::{AccountRepository, StoreInsert};
use crate::error::AccountsResult;

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> SignUpUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, input: SignUpInput) -> AccountsResult<Outcome> {
        if let Err(violation) =
            credential_rules::validate_registration(&input.username, &input.password, &input.email)
        {
            return Ok(Outcome::InputInvalid(violation));
        }

        let username = escape_html(&input.username);
        let email = escape_html(&input.email);
        let password = escape_html(&input.password);

        let password_hash = ClearTextSecret::new(password).hash()?;

        let account = Account::register(username, email, password_hash);

        // Uniqueness of username and email is decided by the store's
        // constraints in the insert itself; a pre-read would race with
        // concurrent registrations.
        match self.accounts.insert(&account).await? {
            StoreInsert::Duplicate => Ok(Outcome::RegistrationConflict),
            StoreInsert::Inserted => {
                tracing::info!(username = %account.username, "Account registered");
                Ok(Outcome::Registered {
                    email: account.email,
                })
            }
        }
    }
}
