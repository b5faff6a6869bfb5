//! Secret Hashing and Verification
//!
//! One-way hashing for short-lived secrets (passwords, verification
//! codes) using Argon2id:
//! - Memory-hard hashing resists GPU/ASIC cracking
//! - Random per-hash salt; salt and parameters travel inside the PHC
//!   string, so verification needs no external state
//! - Plaintext buffers are zeroized on drop
//! - Verification is constant-time inside the argon2 crate

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Hashing/verification errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    /// Hashing operation failed
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not a valid PHC string
    #[error("Invalid secret hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Secret (zeroized on drop)
// ============================================================================

/// A plaintext secret with automatic memory zeroization
///
/// Wraps user-supplied secret material so it is securely erased from
/// memory when dropped. Does not implement `Clone`; Debug output is
/// redacted.
///
/// ## Examples
/// ```rust
/// use platform::secret::ClearTextSecret;
///
/// let secret = ClearTextSecret::new("Abcd1!".to_string());
/// let hashed = secret.hash()?;
/// assert!(hashed.verify(&secret));
/// # Ok::<(), platform::secret::SecretHashError>(())
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextSecret(String);

impl ClearTextSecret {
    /// Wrap a plaintext secret
    ///
    /// No policy is applied here; format rules live with the caller.
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    /// The secret as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the secret with Argon2id
    ///
    /// Generates a random 16-byte salt and uses the argon2 crate's
    /// default parameters (OWASP-recommended m=19456 KiB, t=2, p=1).
    /// Returns the hash in PHC string form.
    pub fn hash(&self) -> Result<HashedSecret, SecretHashError> {
        let salt = SaltString::generate(OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(HashedSecret {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed Secret (safe to store)
// ============================================================================

/// An Argon2id hash in PHC string format
///
/// The PHC string embeds the algorithm identifier, version, parameters,
/// salt, and digest, so a stored value is self-describing. Safe to
/// persist and to log.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret {
    hash: String,
}

impl HashedSecret {
    /// Parse from a PHC string (e.g. loaded from the database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| SecretHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// The PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a plaintext secret against this hash
    ///
    /// The argon2 crate compares digests in constant time; no early-exit
    /// timing difference between wrong-secret and right-secret beyond
    /// the algorithm itself.
    pub fn verify(&self, secret: &ClearTextSecret) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedSecret")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_SECRET]")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let secret = ClearTextSecret::new("Abcd1!".to_string());
        let hashed = secret.hash().unwrap();

        assert!(hashed.verify(&secret));

        let wrong = ClearTextSecret::new("Dcba1!".to_string());
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let secret = ClearTextSecret::new("Abcd1!".to_string());
        let first = secret.hash().unwrap();
        let second = secret.hash().unwrap();

        // Fresh salt each call, so the PHC strings differ but both verify
        assert_ne!(first.as_phc_string(), second.as_phc_string());
        assert!(first.verify(&secret));
        assert!(second.verify(&secret));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let secret = ClearTextSecret::new("Code1!".to_string());
        let hashed = secret.hash().unwrap();

        let phc = hashed.as_phc_string().to_string();
        let restored = HashedSecret::from_phc_string(phc).unwrap();

        assert!(restored.verify(&secret));
    }

    #[test]
    fn test_invalid_phc_string_rejected() {
        assert!(HashedSecret::from_phc_string("not a phc string").is_err());
        assert!(HashedSecret::from_phc_string("").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let secret = ClearTextSecret::new("TopSecret1!".to_string());
        let debug = format!("{:?}", secret);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("TopSecret"));

        let hashed = secret.hash().unwrap();
        let debug = format!("{:?}", hashed);
        assert!(debug.contains("HASH"));
    }

    #[test]
    fn test_numeric_code_hashing() {
        // Verification codes go through the same pipeline as passwords
        let code = ClearTextSecret::new("483920".to_string());
        let hashed = code.hash().unwrap();

        assert!(hashed.verify(&ClearTextSecret::new("483920".to_string())));
        assert!(!hashed.verify(&ClearTextSecret::new("000000".to_string())));
    }
}
