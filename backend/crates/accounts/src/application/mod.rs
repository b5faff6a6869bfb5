//! Application Layer
//!
//! Use cases and application services.

pub mod close_account;
pub mod config;
pub mod issue_code;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod verify_code;

// Re-exports
pub use close_account::CloseAccountUseCase;
pub use config::AccountsConfig;
pub use issue_code::IssueCodeUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use verify_code::VerifyCodeUseCase;
