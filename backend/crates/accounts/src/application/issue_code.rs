//! Issue Code Use Case
//!
//! Issues, reissues, and reports on pending verification codes for an
//! email address. A resend always deletes the old code before creating
//! a new one; codes are never updated in place.

use std::sync::Arc;

use platform::secret::ClearTextSecret;

use crate::application::config::AccountsConfig;
use crate::domain::outcome::Outcome;
use crate::domain::repository::{MailSender, StoreInsert, VerificationCodeStore};
use crate::domain::verification_code;
use crate::error::AccountsResult;

/// Issue code use case
pub struct IssueCodeUseCase<C, M>
where
    C: VerificationCodeStore,
    M: MailSender,
{
    codes: Arc<C>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<C, M> IssueCodeUseCase<C, M>
where
    C: VerificationCodeStore,
    M: MailSender,
{
    pub fn new(codes: Arc<C>, mailer: Arc<M>, config: Arc<AccountsConfig>) -> Self {
        Self {
            codes,
            mailer,
            config,
        }
    }

    /// Issue a code, resend one, or report that one is pending
    ///
    /// With a live code present, `resend_requested` picks between
    /// delete-then-reissue and the "you already have a code" answer.
    /// With none present, a first code is issued regardless.
    pub async fn execute(&self, email: &str, resend_requested: bool) -> AccountsResult<Outcome> {
        if self.has_live_code(email).await? {
            if resend_requested {
                self.codes.delete_code(email).await?;
                return Ok(if self.issue(email).await? {
                    Outcome::CodeResent
                } else {
                    Outcome::CodeSendFailed
                });
            }
            return Ok(Outcome::CodePending);
        }

        Ok(if self.issue(email).await? {
            Outcome::CodeSent
        } else {
            Outcome::CodeSendFailed
        })
    }

    /// Whether a live code already exists for this email
    ///
    /// Presence only; the code itself is never exposed.
    pub async fn has_live_code(&self, email: &str) -> AccountsResult<bool> {
        Ok(self.codes.find_code(email).await?.is_some())
    }

    /// Generate, store, and mail one code
    ///
    /// Returns whether the code is now both stored and on its way. Any
    /// failure along the way leaves the store without a code for this
    /// email, so a later attempt starts clean.
    async fn issue(&self, email: &str) -> AccountsResult<bool> {
        let code = verification_code::generate_code().to_string();
        let code_hash = ClearTextSecret::new(code.clone()).hash()?;

        match self.codes.insert_code(email, code_hash.as_phc_string()).await? {
            StoreInsert::Inserted => {}
            StoreInsert::Duplicate => {
                // Lost a race against a concurrent issue for the same
                // email; that request's code is the live one.
                tracing::warn!(email = %email, "Concurrent code issue detected");
                return Ok(false);
            }
        }

        if let Err(e) = self
            .mailer
            .send(email, &self.config.mail_subject, &code)
            .await
        {
            tracing::warn!(email = %email, error = %e, "Verification mail delivery failed");
            // The stored code would be unreachable without the mail;
            // remove it to keep the one-live-code invariant clean.
            self.codes.delete_code(email).await?;
            return Ok(false);
        }

        tracing::info!(email = %email, "Verification code issued");
        Ok(true)
    }
}
