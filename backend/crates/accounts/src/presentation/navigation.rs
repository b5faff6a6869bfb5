//! Outcome Routing
//!
//! Maps every workflow outcome to exactly one navigation action and, if
//! one applies, a categorized session notice. All navigation policy
//! lives in this one table; the HTTP layer only executes what it is
//! handed.

use uuid::Uuid;

use crate::domain::outcome::Outcome;
use crate::domain::repository::{SessionStore, session_keys};
use crate::error::AccountsResult;
use crate::presentation::messages::{self, NoticeCategory};
use crate::presentation::routes;

/// A navigation action, pure data
///
/// `Forward` hands the request to another flow within the same request
/// cycle (the forwarded flow ends in a redirect of its own); the other
/// variants translate directly to a 303 redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Plain redirect
    Redirect { to: &'static str },
    /// Redirect after stashing a read-once notice in the session
    RedirectWithNotice {
        to: &'static str,
        category: NoticeCategory,
        notice: &'static str,
    },
    /// Redirect carrying a whitelisted notice code as a query parameter
    RedirectWithParam {
        to: &'static str,
        param: &'static str,
        value: &'static str,
    },
    /// Run another flow within this request
    Forward { to: &'static str },
}

/// Map one outcome to its navigation action and session effects
///
/// `origin` is the form the request came from; only the input-invalid
/// outcome routes back to it.
pub async fn route_outcome<S>(
    outcome: Outcome,
    origin: &'static str,
    sessions: &S,
    session_id: Uuid,
) -> AccountsResult<Navigation>
where
    S: SessionStore + Sync,
{
    match outcome {
        Outcome::InputInvalid(violation) => {
            stash_notice(
                sessions,
                session_id,
                origin,
                NoticeCategory::Validation,
                messages::validation_notice(violation),
            )
            .await
        }

        Outcome::AuthenticationFailed => {
            stash_notice(
                sessions,
                session_id,
                routes::LOGIN,
                NoticeCategory::Login,
                messages::FAILED_AUTHENTICATION,
            )
            .await
        }

        Outcome::AccountDeleted => {
            stash_notice(
                sessions,
                session_id,
                routes::LOGIN,
                NoticeCategory::Login,
                messages::DELETED_ACCOUNT,
            )
            .await
        }

        Outcome::AccountUnverified { email } | Outcome::Registered { email } => {
            // The email travels in the session, never as a shown notice;
            // the code-issuance flow picks it up from there.
            sessions
                .put(session_id, session_keys::PENDING_EMAIL, &email)
                .await?;
            Ok(Navigation::Forward {
                to: routes::EMAIL_SENDER,
            })
        }

        Outcome::Authenticated { username } => {
            // A fresh sign-in invalidates any notice still pending from
            // earlier attempts.
            for key in [
                session_keys::VALIDATION_NOTICE,
                session_keys::LOGIN_NOTICE,
                session_keys::REGISTRATION_NOTICE,
                session_keys::VERIFICATION_NOTICE,
            ] {
                sessions.remove(session_id, key).await?;
            }
            sessions
                .put(session_id, session_keys::USERNAME, &username)
                .await?;
            sessions
                .put(session_id, session_keys::LOGGED_IN, "true")
                .await?;
            Ok(Navigation::Redirect {
                to: routes::USER_PAGE,
            })
        }

        Outcome::RegistrationConflict => {
            stash_notice(
                sessions,
                session_id,
                routes::REGISTRATION,
                NoticeCategory::Registration,
                messages::USERNAME_OR_EMAIL_TAKEN,
            )
            .await
        }

        Outcome::CodeSent => {
            stash_notice(
                sessions,
                session_id,
                routes::VERIFICATION,
                NoticeCategory::Verification,
                messages::CODE_SENT,
            )
            .await
        }

        Outcome::CodeResent => {
            stash_notice(
                sessions,
                session_id,
                routes::VERIFICATION,
                NoticeCategory::Verification,
                messages::CODE_RESENT,
            )
            .await
        }

        Outcome::CodePending => {
            stash_notice(
                sessions,
                session_id,
                routes::VERIFICATION,
                NoticeCategory::Verification,
                messages::CODE_PENDING,
            )
            .await
        }

        Outcome::CodeSendFailed => {
            stash_notice(
                sessions,
                session_id,
                routes::VERIFICATION,
                NoticeCategory::Verification,
                messages::CODE_SEND_FAILED,
            )
            .await
        }

        Outcome::CodeInvalid => {
            stash_notice(
                sessions,
                session_id,
                routes::VERIFICATION,
                NoticeCategory::Verification,
                messages::CODE_INVALID,
            )
            .await
        }

        Outcome::CodeValid { .. } => {
            sessions
                .remove(session_id, session_keys::PENDING_EMAIL)
                .await?;
            stash_notice(
                sessions,
                session_id,
                routes::LOGIN,
                NoticeCategory::Login,
                messages::ACCOUNT_ACTIVATED,
            )
            .await
        }

        Outcome::AccountClosed => {
            sessions
                .put(session_id, session_keys::ACCOUNT_CLOSED, "true")
                .await?;
            Ok(Navigation::Forward {
                to: routes::LOG_OUT,
            })
        }

        Outcome::LoggedOut { account_closed } => {
            // The session is gone; the farewell rides the redirect as a
            // whitelisted code.
            let value = if account_closed {
                messages::ACCOUNT_CLOSED_CODE
            } else {
                messages::SIGNED_OUT_CODE
            };
            Ok(Navigation::RedirectWithParam {
                to: routes::LOGIN,
                param: "notice",
                value,
            })
        }
    }
}

async fn stash_notice<S>(
    sessions: &S,
    session_id: Uuid,
    to: &'static str,
    category: NoticeCategory,
    notice: &'static str,
) -> AccountsResult<Navigation>
where
    S: SessionStore + Sync,
{
    sessions
        .put(session_id, category.session_key(), notice)
        .await?;
    Ok(Navigation::RedirectWithNotice {
        to,
        category,
        notice,
    })
}
