//! Credential Rules
//!
//! Pure format validation of raw username, password, and email strings.
//! No I/O, no side effects; the only decision made here is whether a
//! string is shaped correctly.
//!
//! Empty or missing fields always fail first, before any format check,
//! with their own distinct reason.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// 4-8 characters, letters and digits only
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{4,8}$").expect("username pattern is valid")
});

/// 4-8 characters from the allowed set, requiring at least one
/// uppercase, one lowercase, one digit, and one punctuation character
static PASSWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9!@#$%^&*]{4,8}$").expect("password pattern is valid")
});

/// Punctuation characters a password may (and must once) contain
const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// local@domain.tld shape: no whitespace around the @, dot in the domain
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Why a set of credentials was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialViolation {
    /// One or more fields were empty
    EmptyFields,
    /// Username does not match the allowed shape
    BadUsername,
    /// Password does not match the allowed shape
    BadPassword,
    /// Email does not match the allowed shape
    BadEmail,
}

impl fmt::Display for CredentialViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyFields => "empty fields",
            Self::BadUsername => "invalid username format",
            Self::BadPassword => "invalid password format",
            Self::BadEmail => "invalid email format",
        };
        f.write_str(text)
    }
}

/// Validate the two sign-in fields
///
/// Check order: emptiness, then username shape, then password shape.
pub fn validate_login(username: &str, password: &str) -> Result<(), CredentialViolation> {
    if has_empty_fields(&[username, password]) {
        return Err(CredentialViolation::EmptyFields);
    }
    if !is_valid_username(username) {
        return Err(CredentialViolation::BadUsername);
    }
    if !is_valid_password(password) {
        return Err(CredentialViolation::BadPassword);
    }
    Ok(())
}

/// Validate the three registration fields
///
/// Same ordering as [`validate_login`], with the email checked last.
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
) -> Result<(), CredentialViolation> {
    if has_empty_fields(&[username, password, email]) {
        return Err(CredentialViolation::EmptyFields);
    }
    if !is_valid_username(username) {
        return Err(CredentialViolation::BadUsername);
    }
    if !is_valid_password(password) {
        return Err(CredentialViolation::BadPassword);
    }
    if !is_valid_email(email) {
        return Err(CredentialViolation::BadEmail);
    }
    Ok(())
}

fn has_empty_fields(inputs: &[&str]) -> bool {
    inputs.iter().any(|input| input.is_empty())
}

fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

fn is_valid_password(password: &str) -> bool {
    PASSWORD_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c))
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

// ============================================================================
// Tests
// ============================================================================
