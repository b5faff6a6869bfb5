//! Infrastructure Layer
//!
//! Store and mail implementations behind the domain traits.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::LogMailSender;
pub use memory::MemoryStore;
pub use postgres::PgAccountStore;
