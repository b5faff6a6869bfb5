//! Session Transport
//!
//! The session id lives server-side; the browser only holds an
//! HMAC-SHA256-signed token `"<uuid>.<signature>"` in an HttpOnly
//! cookie. A token that fails signature verification is treated as no
//! session at all.

use axum::http::HeaderMap;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use platform::cookie::{build_cookie, expire_cookie, extract_cookie};

use crate::application::config::AccountsConfig;

/// The session resolved for one request
pub struct ClientSession {
    pub session_id: Uuid,
    /// Set-Cookie value to attach when the session was just minted
    pub set_cookie: Option<String>,
}

/// Resolve the request's session, minting a fresh one if needed
pub fn establish_session(headers: &HeaderMap, config: &AccountsConfig) -> ClientSession {
    if let Some(token) = extract_cookie(headers, &config.session_cookie_name) {
        if let Some(session_id) = parse_token(&token, &config.session_secret) {
            return ClientSession {
                session_id,
                set_cookie: None,
            };
        }
        tracing::debug!("Discarding session cookie with bad signature");
    }

    let session_id = Uuid::new_v4();
    let token = mint_token(session_id, &config.session_secret);
    let cookie = build_cookie(&config.session_cookie_name, &token, &config.cookie_policy());

    ClientSession {
        session_id,
        set_cookie: Some(cookie),
    }
}

/// The session id of the request, if it carries a validly signed token
pub fn current_session(headers: &HeaderMap, config: &AccountsConfig) -> Option<Uuid> {
    let token = extract_cookie(headers, &config.session_cookie_name)?;
    parse_token(&token, &config.session_secret)
}

/// Set-Cookie value that drops the session cookie
pub fn clear_session_cookie(config: &AccountsConfig) -> String {
    expire_cookie(&config.session_cookie_name, &config.cookie_policy())
}

/// Sign a session id into a cookie token
pub fn mint_token(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify a cookie token and recover the session id
pub fn parse_token(token: &str, secret: &[u8; 32]) -> Option<Uuid> {
    let (session_id_str, signature_b64) = token.split_once('.')?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    mac.verify_slice(&signature).ok()?;

    session_id_str.parse().ok()
}
