//! Accounts Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::{
    AccountRepository, MailSender, SessionStore, VerificationCodeStore,
};
use crate::infra::postgres::PgAccountStore;
use crate::presentation::handlers::{self, AccountsAppState};
use crate::presentation::middleware::{LoginGuardState, require_login};
use crate::presentation::routes;

/// Create the accounts router with the PostgreSQL store
pub fn accounts_router<M>(store: PgAccountStore, mailer: M, config: AccountsConfig) -> Router
where
    M: MailSender + Clone + Send + Sync + 'static,
{
    accounts_router_generic(store, mailer, config)
}

/// Create the accounts router for any store implementation
pub fn accounts_router_generic<R, M>(store: R, mailer: M, config: AccountsConfig) -> Router
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let state = AccountsAppState {
        store: Arc::new(store),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    let guard = LoginGuardState {
        store: state.store.clone(),
        config: state.config.clone(),
    };

    // The user area requires a signed-in session
    let user_area = Router::new()
        .route(routes::USER_PAGE, get(handlers::user_page::<R, M>))
        .route(routes::LOG_OUT, post(handlers::sign_out::<R, M>))
        .route(routes::CLOSE_ACCOUNT, post(handlers::close_account::<R, M>))
        .route_layer(axum::middleware::from_fn_with_state(
            guard,
            require_login::<R>,
        ))
        .with_state(state.clone());

    Router::new()
        .route(
            routes::LOGIN,
            get(handlers::login_view::<R, M>).post(handlers::sign_in::<R, M>),
        )
        .route(
            routes::REGISTRATION,
            get(handlers::registration_view::<R, M>).post(handlers::sign_up::<R, M>),
        )
        .route(
            routes::VERIFICATION,
            get(handlers::verification_view::<R, M>).post(handlers::verify::<R, M>),
        )
        .route(routes::EMAIL_SENDER, post(handlers::send_code::<R, M>))
        .with_state(state)
        .merge(user_area)
}
