//! Account Entity
//!
//! A registered identity with credentials and lifecycle flags.
//!
//! Lifecycle: created unverified (`active=false, deleted=false`); the
//! verification flow flips `active` exactly once; closing the account
//! sets `deleted=true` and forces `active=false`. Records are never
//! physically removed. The `active && deleted` combination is
//! unreachable through these mutators.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use platform::secret::HashedSecret;

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: Uuid,
    /// Username (globally unique, used for sign-in)
    pub username: String,
    /// Email address (globally unique, used for verification)
    pub email: String,
    /// Argon2id password hash, PHC string form
    pub password_hash: HashedSecret,
    /// Whether the email has been verified
    pub active: bool,
    /// Whether the account has been soft-deleted
    pub deleted: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh, not-yet-verified account
    pub fn register(username: String, email: String, password_hash: HashedSecret) -> Self {
        let now = Utc::now();

        Self {
            account_id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            active: false,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the email as verified
    ///
    /// Idempotent; a closed account stays closed.
    pub fn activate(&mut self) {
        if self.deleted {
            return;
        }
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Soft-delete the account
    ///
    /// Keeps the record (and its unique username/email claims) but bars
    /// any future sign-in.
    pub fn close(&mut self) {
        self.deleted = true;
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Whether sign-in may succeed for this account
    pub fn can_sign_in(&self) -> bool {
        self.active && !self.deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::secret::ClearTextSecret;

    fn some_hash() -> HashedSecret {
        ClearTextSecret::new("Abcd1!".to_string()).hash().unwrap()
    }

    #[test]
    fn test_register_starts_unverified() {
        let account = Account::register("user1".into(), "a@b.com".into(), some_hash());
        assert!(!account.active);
        assert!(!account.deleted);
        assert!(!account.can_sign_in());
    }

    #[test]
    fn test_activate() {
        let mut account = Account::register("user1".into(), "a@b.com".into(), some_hash());
        account.activate();
        assert!(account.active);
        assert!(account.can_sign_in());

        // A second activation changes nothing
        account.activate();
        assert!(account.active);
    }

    #[test]
    fn test_close_clears_active() {
        let mut account = Account::register("user1".into(), "a@b.com".into(), some_hash());
        account.activate();
        account.close();
        assert!(account.deleted);
        assert!(!account.active);
        assert!(!account.can_sign_in());
    }

    #[test]
    fn test_active_and_deleted_is_unreachable() {
        // Walk every mutator sequence and assert the invalid state never
        // appears.
        let mut account = Account::register("user1".into(), "a@b.com".into(), some_hash());
        assert!(!(account.active && account.deleted));

        account.activate();
        assert!(!(account.active && account.deleted));

        account.close();
        assert!(!(account.active && account.deleted));

        // Activation after closing must not resurrect the account
        account.activate();
        assert!(!(account.active && account.deleted));
        assert!(!account.active);
    }
}
