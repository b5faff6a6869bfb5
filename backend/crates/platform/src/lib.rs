//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Secret hashing (Argon2id) for passwords and one-time codes
//! - Cookie handling helpers
//! - HTML escaping for untrusted input

pub mod cookie;
pub mod sanitize;
pub mod secret;
