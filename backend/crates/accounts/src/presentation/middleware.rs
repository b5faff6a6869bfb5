//! Login Guard Middleware
//!
//! Requests under the user area must belong to a signed-in session;
//! everything else bounces to the sign-in view with the not-logged-in
//! notice riding the redirect as a query parameter.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::{SessionStore, session_keys};
use crate::presentation::messages;
use crate::presentation::routes;
use crate::presentation::session;

/// Middleware state
#[derive(Clone)]
pub struct LoginGuardState<R>
where
    R: SessionStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<R>,
    pub config: Arc<AccountsConfig>,
}

/// Middleware that requires a signed-in session
pub async fn require_login<R>(
    State(state): State<LoginGuardState<R>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    R: SessionStore + Clone + Send + Sync + 'static,
{
    let logged_in = match session::current_session(req.headers(), &state.config) {
        Some(session_id) => state
            .store
            .get(session_id, session_keys::LOGGED_IN)
            .await
            .ok()
            .flatten()
            .is_some(),
        None => false,
    };

    if !logged_in {
        let to = format!(
            "{}?notice={}",
            routes::LOGIN,
            messages::LOGIN_REQUIRED_CODE
        );
        return Redirect::to(&to).into_response();
    }

    next.run(req).await
}
