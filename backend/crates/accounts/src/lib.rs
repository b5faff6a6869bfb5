//! Accounts Backend Module
//!
//! Account lifecycle and authentication workflows for the diary
//! application.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, credential rules, outcomes, repository traits
//! - `application/` - Use cases (sign in/up, code issue/verify, sign out, close)
//! - `infra/` - PostgreSQL and in-memory store implementations
//! - `presentation/` - HTTP handlers, DTOs, outcome routing, middleware
//!
//! ## Features
//! - Registration with username/password/email format rules
//! - Email ownership proven by a one-time 6-digit code before activation
//! - Sign-in gated on account state (unverified / active / closed)
//! - Soft deletion; closed accounts stay on record but cannot sign in
//! - Read-once session notices surviving exactly one redirect
//!
//! ## Security Model
//! - Passwords and codes hashed with Argon2id (salted, memory-hard)
//! - Unknown-username and wrong-password collapse into one outcome
//! - One live code per email, enforced by a storage-layer constraint
//! - Session ids carried in HMAC-signed HttpOnly cookies

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use error::{AccountsError, AccountsResult};
pub use infra::postgres::PgAccountStore;
pub use presentation::router::{accounts_router, accounts_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::account::Account;
    pub use crate::domain::outcome::Outcome;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::memory::MemoryStore;
    pub use crate::infra::postgres::PgAccountStore;
}
