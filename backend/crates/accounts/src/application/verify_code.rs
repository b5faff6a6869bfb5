//! Verify Code Use Case
//!
//! Consumes a submitted verification code and activates the account it
//! was issued for. Consumption is one-shot: the stored code is deleted
//! on success, so replaying the same code yields the invalid outcome.

use std::sync::Arc;

use platform::sanitize::escape_html;
use platform::secret::{ClearTextSecret, HashedSecret};

use crate::domain::outcome::Outcome;
use crate::domain::repository::{AccountRepository, VerificationCodeStore};
use crate::error::{AccountsError, AccountsResult};

/// Verify code use case
pub struct VerifyCodeUseCase<R, C>
where
    R: AccountRepository,
    C: VerificationCodeStore,
{
    accounts: Arc<R>,
    codes: Arc<C>,
}

impl<R, C> VerifyCodeUseCase<R, C>
where
    R: AccountRepository,
    C: VerificationCodeStore,
{
    pub fn new(accounts: Arc<R>, codes: Arc<C>) -> Self {
        Self { accounts, codes }
    }

    pub async fn execute(&self, email: &str, submitted_code: &str) -> AccountsResult<Outcome> {
        let submitted = escape_html(submitted_code);

        let Some(stored) = self.codes.find_code(email).await? else {
            return Ok(Outcome::CodeInvalid);
        };

        let stored_hash = HashedSecret::from_phc_string(stored)?;
        if !stored_hash.verify(&ClearTextSecret::new(submitted)) {
            return Ok(Outcome::CodeInvalid);
        }

        // Consume the code. If another request consumed it between our
        // read and this delete, that request owns the activation.
        if !self.codes.delete_code(email).await? {
            return Ok(Outcome::CodeInvalid);
        }

        let Some(mut account) = self.accounts.find_by_email(email).await? else {
            return Err(AccountsError::AccountMissing(
                "verified email has no account".to_string(),
            ));
        };

        account.activate();
        self.accounts.update(&account).await?;

        tracing::info!(username = %account.username, "Account activated");

        Ok(Outcome::CodeValid {
            email: email.to_string(),
        })
    }
}
