//! Workflow Outcomes
//!
//! The tagged result every account workflow resolves to. Owned
//! transiently per request, never persisted. The outcome router in the
//! presentation layer maps each variant to a navigation action and a
//! categorized notice.

use crate::domain::credential_rules::CredentialViolation;

/// Result of an account workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A field failed format validation; no side effects happened
    InputInvalid(CredentialViolation),

    /// Unknown username or wrong password; deliberately one variant so
    /// responses cannot be used to enumerate usernames
    AuthenticationFailed,

    /// Credentials matched but the account is soft-deleted
    AccountDeleted,

    /// Credentials matched but the email was never verified
    AccountUnverified { email: String },

    /// Sign-in succeeded
    Authenticated { username: String },

    /// Account created, waiting for email verification
    Registered { email: String },

    /// Username or email already taken
    RegistrationConflict,

    /// First verification code stored and mailed
    CodeSent,

    /// A fresh code replaced the previous one and was mailed
    CodeResent,

    /// A live code already exists for this email; nothing was sent
    CodePending,

    /// Mail delivery failed; no code is left behind in the store
    CodeSendFailed,

    /// Submitted code absent, wrong, or already consumed
    CodeInvalid,

    /// Code consumed; the account is now active
    CodeValid { email: String },

    /// Account soft-deleted at the user's request
    AccountClosed,

    /// Session destroyed; flag records whether this followed a deletion
    LoggedOut { account_closed: bool },
}
