//! User-Facing Notices
//!
//! Every feedback string the account flows can show, plus the category
//! that decides which session key (and therefore which view) carries
//! it. At most one notice is visible per rendered view.

use crate::domain::credential_rules::CredentialViolation;
use crate::domain::repository::session_keys;

/// Which view a notice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCategory {
    /// Input format problems, shown on the form that was submitted
    Validation,
    /// Sign-in view notices
    Login,
    /// Registration view notices
    Registration,
    /// Verification view notices
    Verification,
}

impl NoticeCategory {
    /// The session key this category's notice is stored under
    pub fn session_key(&self) -> &'static str {
        match self {
            Self::Validation => session_keys::VALIDATION_NOTICE,
            Self::Login => session_keys::LOGIN_NOTICE,
            Self::Registration => session_keys::REGISTRATION_NOTICE,
            Self::Verification => session_keys::VERIFICATION_NOTICE,
        }
    }
}

// ============================================================================
// Notice texts
// ============================================================================

pub const EMPTY_FIELDS: &str = "Please fill in all fields.";
pub const BAD_USERNAME: &str =
    "Username must be between 4 and 8 characters long and may only contain letters and digits.";
pub const BAD_PASSWORD: &str = "Password must be between 4 and 8 characters long and include at \
     least one uppercase letter, one lowercase letter, one digit, and one of !@#$%^&*.";
pub const BAD_EMAIL: &str = "Email format invalid.";

pub const FAILED_AUTHENTICATION: &str = "Incorrect username or password.";
pub const DELETED_ACCOUNT: &str =
    "This account has been deactivated. If you think this is a mistake, please contact support.";
pub const ACCOUNT_ACTIVATED: &str = "Account activated! Please log in.";
pub const NOT_LOGGED_IN: &str = "Please log in to use the application.";

pub const USERNAME_OR_EMAIL_TAKEN: &str = "Username or email already taken.";

pub const CODE_SENT: &str = "A verification code was sent to your registered email. Please enter \
     the code below to verify your account.";
pub const CODE_PENDING: &str = "Your account is not yet verified. Check your registered email for \
     the verification code and enter it below.";
pub const CODE_INVALID: &str = "Invalid verification code. Try again or send a new code.";
pub const CODE_RESENT: &str = "New verification code sent to your email.";
pub const CODE_SEND_FAILED: &str = "Error sending verification code. Please try again.";

pub const SIGNED_OUT: &str = "Successful logout.";
pub const ACCOUNT_CLOSED: &str = "Account deletion successful.";

/// The notice for a failed credential check
pub fn validation_notice(violation: CredentialViolation) -> &'static str {
    match violation {
        CredentialViolation::EmptyFields => EMPTY_FIELDS,
        CredentialViolation::BadUsername => BAD_USERNAME,
        CredentialViolation::BadPassword => BAD_PASSWORD,
        CredentialViolation::BadEmail => BAD_EMAIL,
    }
}

// ============================================================================
// Notice codes carried in a query parameter
// ============================================================================
//
// Sign-out destroys the session, so its farewell cannot travel through
// session state; it rides the redirect as a short whitelisted code
// instead of free text.

pub const SIGNED_OUT_CODE: &str = "signed-out";
pub const ACCOUNT_CLOSED_CODE: &str = "account-closed";
pub const LOGIN_REQUIRED_CODE: &str = "login-required";

/// Resolve a whitelisted notice code to its text
///
/// Anything else in the parameter is ignored, so the query string
/// cannot be used to inject arbitrary notices into the view.
pub fn notice_for_code(code: &str) -> Option<&'static str> {
    match code {
        SIGNED_OUT_CODE => Some(SIGNED_OUT),
        ACCOUNT_CLOSED_CODE => Some(ACCOUNT_CLOSED),
        LOGIN_REQUIRED_CODE => Some(NOT_LOGGED_IN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_are_distinct() {
        let keys = [
            NoticeCategory::Validation.session_key(),
            NoticeCategory::Login.session_key(),
            NoticeCategory::Registration.session_key(),
            NoticeCategory::Verification.session_key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_notice_codes_resolve() {
        assert_eq!(notice_for_code(SIGNED_OUT_CODE), Some(SIGNED_OUT));
        assert_eq!(notice_for_code(ACCOUNT_CLOSED_CODE), Some(ACCOUNT_CLOSED));
        assert_eq!(notice_for_code(LOGIN_REQUIRED_CODE), Some(NOT_LOGGED_IN));
        assert_eq!(notice_for_code("something-else"), None);
        assert_eq!(notice_for_code(""), None);
    }
}
