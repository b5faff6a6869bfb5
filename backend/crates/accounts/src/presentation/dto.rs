//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Form bodies
// ============================================================================
//
// Missing fields deserialize to empty strings so the credential rules
// can answer with the empty-fields notice instead of a 422.

/// Sign in form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Code submission form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationForm {
    #[serde(default)]
    pub verification_code: String,
}

/// Code issuance form; the field is present when the user asked for a
/// fresh code
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeForm {
    pub send_new_code: Option<String>,
}

// ============================================================================
// View data
// ============================================================================

/// Data behind a rendered form view: at most one pending notice
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDataResponse {
    pub notice: Option<String>,
}

/// Data behind the signed-in user's home view
///
/// Diary content itself is assembled elsewhere; the account flows only
/// contribute who is signed in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    pub username: String,
}

/// Query parameters accepted by the sign-in view
#[derive(Debug, Clone, Deserialize)]
pub struct LoginViewQuery {
    /// Whitelisted notice code set by the sign-out redirect
    pub notice: Option<String>,
}
