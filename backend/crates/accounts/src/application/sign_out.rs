//! Sign Out Use Case
//!
//! Destroys all server-side session state. Remembers (from the session
//! being destroyed) whether this sign-out concludes an account
//! deletion, so the sign-in view can word its farewell accordingly.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::outcome::Outcome;
use crate::domain::repository::{SessionStore, session_keys};
use crate::error::AccountsResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, session_id: Uuid) -> AccountsResult<Outcome> {
        let account_closed = self
            .sessions
            .get(session_id, session_keys::ACCOUNT_CLOSED)
            .await?
            .is_some();

        self.sessions.destroy(session_id).await?;

        tracing::info!(session_id = %session_id, "Signed out");

        Ok(Outcome::LoggedOut { account_closed })
    }
}
