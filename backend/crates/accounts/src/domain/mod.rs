//! Domain Layer
//!
//! Entities, credential rules, workflow outcomes, and repository traits.

pub mod account;
pub mod credential_rules;
pub mod outcome;
pub mod repository;
pub mod verification_code;

// Re-exports
pub use account::Account;
pub use outcome::Outcome;
pub use repository::{
    AccountRepository, MailSender, SessionStore, StoreInsert, VerificationCodeStore,
};
