//! Route Paths
//!
//! The URI surface of the account flows, kept in one place so the
//! outcome router, handlers, and middleware agree on targets.

pub const LOGIN: &str = "/login";
pub const REGISTRATION: &str = "/registration";
pub const VERIFICATION: &str = "/verification";
pub const EMAIL_SENDER: &str = "/email-sender";
pub const USER_PAGE: &str = "/user/diary";
pub const LOG_OUT: &str = "/user/logout";
pub const CLOSE_ACCOUNT: &str = "/user/account-deletion";
