//! Repository Traits
//!
//! Interfaces for the durable collaborators. Implementations live in
//! the infrastructure layer; tests supply in-memory fakes.

use uuid::Uuid;

use crate::domain::account::Account;
use crate::error::AccountsResult;

/// Result of an insert against a store with a uniqueness constraint
///
/// `Duplicate` is an expected, recoverable answer (someone holds the
/// key already), decided atomically by the store itself rather than by
/// a read-then-write in application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreInsert {
    Inserted,
    Duplicate,
}

/// Account repository trait
///
/// Username and email each carry a unique constraint; `insert` reports
/// a violation of either as `Duplicate`.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Persist a new account
    async fn insert(&self, account: &Account) -> AccountsResult<StoreInsert>;

    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>>;

    /// Update an existing account's flags and hash
    async fn update(&self, account: &Account) -> AccountsResult<()>;
}

/// Verification code store trait
///
/// At most one live code per email, enforced by the store's key
/// constraint even under concurrent inserts. Reissuing requires an
/// explicit delete first; there is no update-in-place.
#[trait_variant::make(VerificationCodeStore: Send)]
pub trait LocalVerificationCodeStore {
    /// Store a code hash for an email
    async fn insert_code(&self, email: &str, code_hash: &str) -> AccountsResult<StoreInsert>;

    /// Fetch the stored code hash for an email, if any
    async fn find_code(&self, email: &str) -> AccountsResult<Option<String>>;

    /// Remove the stored code; returns whether a row was actually removed
    async fn delete_code(&self, email: &str) -> AccountsResult<bool>;
}

/// Session store trait
///
/// String-keyed values scoped to one browsing session. Passed into
/// workflows and the outcome router as an explicit capability, never
/// reached through ambient state.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Read a value without consuming it
    async fn get(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>>;

    /// Write a value, replacing any previous one under the same key
    async fn put(&self, session_id: Uuid, key: &str, value: &str) -> AccountsResult<()>;

    /// Read a value and clear it in one step
    ///
    /// The read-once primitive behind session notices: the next view
    /// that takes a notice also removes it.
    async fn take(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>>;

    /// Remove a single key
    async fn remove(&self, session_id: Uuid, key: &str) -> AccountsResult<()>;

    /// Drop every key of the session
    async fn destroy(&self, session_id: Uuid) -> AccountsResult<()>;
}

/// Session keys used by the account flows
///
/// The four notice keys hold at most one read-once message each; the
/// rest carry flow state between redirects.
pub mod session_keys {
    /// Present (any value) while the user is signed in
    pub const LOGGED_IN: &str = "logged_in";
    /// The signed-in account's username
    pub const USERNAME: &str = "username";
    /// Email an unverified account is currently proving ownership of
    pub const PENDING_EMAIL: &str = "pending_email";
    /// Set by the deletion flow so sign-out can word its farewell
    pub const ACCOUNT_CLOSED: &str = "account_closed";

    /// Read-once notice shown on the form that failed validation
    pub const VALIDATION_NOTICE: &str = "validation_notice";
    /// Read-once notice shown on the sign-in view
    pub const LOGIN_NOTICE: &str = "login_notice";
    /// Read-once notice shown on the registration view
    pub const REGISTRATION_NOTICE: &str = "registration_notice";
    /// Read-once notice shown on the verification view
    pub const VERIFICATION_NOTICE: &str = "verification_notice";
}

/// Mail delivery error
///
/// Recoverable by design: the verification workflow folds it into the
/// code-send-failed outcome instead of propagating it.
#[derive(Debug, thiserror::Error)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Outgoing mail collaborator
#[trait_variant::make(MailSender: Send)]
pub trait LocalMailSender {
    /// Deliver one message
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), MailError>;
}
