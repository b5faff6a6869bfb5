//! Verification Code Generation
//!
//! One-time numeric codes proving email ownership. Only the Argon2id
//! hash of a code is ever stored; the plaintext exists just long enough
//! to be mailed.

use rand::Rng;

/// Lowest six-digit code, inclusive
pub const CODE_LOWER_BOUND: u32 = 100_000;

/// Highest six-digit code, inclusive
pub const CODE_UPPER_BOUND: u32 = 999_999;

/// Generate a uniformly random six-digit code
///
/// Uses the thread-local RNG, so concurrent requests draw from
/// independent generator state.
pub fn generate_code() -> u32 {
    rand::rng().random_range(CODE_LOWER_BOUND..=CODE_UPPER_BOUND)
}
