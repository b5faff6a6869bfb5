//! HTTP Handlers
//!
//! One handler per entry point. Each POST runs its use case, hands the
//! outcome to the outcome router, and executes the resulting navigation;
//! each GET returns the view's data (its pending read-once notice).

use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::AccountsConfig;
use crate::application::{
    CloseAccountUseCase, IssueCodeUseCase, SignInInput, SignInUseCase, SignOutUseCase,
    SignUpInput, SignUpUseCase, VerifyCodeUseCase,
};
use crate::domain::outcome::Outcome;
use crate::domain::repository::{
    AccountRepository, MailSender, SessionStore, VerificationCodeStore, session_keys,
};
use crate::error::{AccountsError, AccountsResult};
use crate::presentation::dto::{
    LoginForm, LoginViewQuery, RegistrationForm, SendCodeForm, UserPageResponse, VerificationForm,
    ViewDataResponse,
};
use crate::presentation::messages;
use crate::presentation::navigation::{self, Navigation};
use crate::presentation::routes;
use crate::presentation::session::{self, ClientSession};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsAppState<R, M>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    pub store: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AccountsConfig>,
}

// ============================================================================
// Sign In
// ============================================================================

/// GET /login
pub async fn login_view<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Query(query): Query<LoginViewQuery>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);
    let session_id = client.session_id;

    // Validation feedback outranks the login-category notice; taking
    // both keys leaves nothing behind for the next render.
    let mut notice = match state
        .store
        .take(session_id, session_keys::VALIDATION_NOTICE)
        .await?
    {
        Some(n) => Some(n),
        None => state.store.take(session_id, session_keys::LOGIN_NOTICE).await?,
    };

    // The sign-out redirect carries its farewell as a whitelisted code
    if let Some(text) = query.notice.as_deref().and_then(messages::notice_for_code) {
        notice = Some(text.to_string());
    }

    Ok(view_response(ViewDataResponse { notice }, client.set_cookie))
}

/// POST /login
pub async fn sign_in<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let use_case = SignInUseCase::new(state.store.clone());
    let outcome = use_case
        .execute(SignInInput {
            username: form.username,
            password: form.password,
        })
        .await?;

    let nav =
        navigation::route_outcome(outcome, routes::LOGIN, &*state.store, client.session_id).await?;

    dispatch(&state, client, nav).await
}

// ============================================================================
// Registration
// ============================================================================

/// GET /registration
pub async fn registration_view<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);
    let session_id = client.session_id;

    let notice = match state
        .store
        .take(session_id, session_keys::VALIDATION_NOTICE)
        .await?
    {
        Some(n) => Some(n),
        None => {
            state
                .store
                .take(session_id, session_keys::REGISTRATION_NOTICE)
                .await?
        }
    };

    Ok(view_response(ViewDataResponse { notice }, client.set_cookie))
}

/// POST /registration
pub async fn sign_up<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
    Form(form): Form<RegistrationForm>,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let use_case = SignUpUseCase::new(state.store.clone());
    let outcome = use_case
        .execute(SignUpInput {
            username: form.username,
            password: form.password,
            email: form.email,
        })
        .await?;

    let nav = navigation::route_outcome(
        outcome,
        routes::REGISTRATION,
        &*state.store,
        client.session_id,
    )
    .await?;

    dispatch(&state, client, nav).await
}

// ============================================================================
// Verification
// ============================================================================

/// GET /verification
pub async fn verification_view<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let notice = state
        .store
        .take(client.session_id, session_keys::VERIFICATION_NOTICE)
        .await?;

    Ok(view_response(ViewDataResponse { notice }, client.set_cookie))
}

/// POST /verification
pub async fn verify<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
    Form(form): Form<VerificationForm>,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let pending_email = state
        .store
        .get(client.session_id, session_keys::PENDING_EMAIL)
        .await?;

    let outcome = match pending_email {
        Some(email) => {
            let use_case = VerifyCodeUseCase::new(state.store.clone(), state.store.clone());
            use_case.execute(&email, &form.verification_code).await?
        }
        // No verification in progress for this session
        None => Outcome::CodeInvalid,
    };

    let nav = navigation::route_outcome(
        outcome,
        routes::VERIFICATION,
        &*state.store,
        client.session_id,
    )
    .await?;

    dispatch(&state, client, nav).await
}

/// POST /email-sender
pub async fn send_code<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
    Form(form): Form<SendCodeForm>,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let nav = issue_pending_code(&state, client.session_id, form.send_new_code.is_some()).await?;

    dispatch(&state, client, nav).await
}

// ============================================================================
// User Page
// ============================================================================

/// GET /user/diary
pub async fn user_page<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    // The login guard already vouched for the session; a missing
    // username here means the session state is torn.
    let Some(session_id) = session::current_session(&headers, &state.config) else {
        return Err(AccountsError::SessionInvalid);
    };
    let Some(username) = state
        .store
        .get(session_id, session_keys::USERNAME)
        .await?
    else {
        return Err(AccountsError::SessionInvalid);
    };

    Ok(Json(UserPageResponse { username }).into_response())
}

// ============================================================================
// Sign Out / Account Deletion
// ============================================================================

/// POST /user/logout
pub async fn sign_out<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let nav = sign_out_flow(&state, client.session_id).await?;

    // The server-side state is gone; drop the cookie with it
    let cleared = ClientSession {
        session_id: client.session_id,
        set_cookie: Some(session::clear_session_cookie(&state.config)),
    };

    dispatch(&state, cleared, nav).await
}

/// POST /user/account-deletion
pub async fn close_account<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let client = session::establish_session(&headers, &state.config);

    let Some(username) = state
        .store
        .get(client.session_id, session_keys::USERNAME)
        .await?
    else {
        return Err(AccountsError::SessionInvalid);
    };

    let use_case = CloseAccountUseCase::new(state.store.clone());
    let outcome = use_case.execute(&username).await?;

    let nav = navigation::route_outcome(
        outcome,
        routes::CLOSE_ACCOUNT,
        &*state.store,
        client.session_id,
    )
    .await?;

    // Deletion forwards into sign-out, which destroys the session
    let cleared = ClientSession {
        session_id: client.session_id,
        set_cookie: Some(session::clear_session_cookie(&state.config)),
    };

    dispatch(&state, cleared, nav).await
}

// ============================================================================
// Navigation dispatch
// ============================================================================

/// Execute a navigation action, following forwards within this request
///
/// A forwarded flow always ends in a redirect, so the client sees a
/// plain Post-Redirect-Get cycle no matter how the flows chain.
async fn dispatch<R, M>(
    state: &AccountsAppState<R, M>,
    client: ClientSession,
    mut nav: Navigation,
) -> AccountsResult<Response>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let mut hops = 0u8;
    loop {
        match nav {
            Navigation::Forward { to } => {
                hops += 1;
                if hops > 2 {
                    return Err(AccountsError::Internal("forward chain too deep".to_string()));
                }
                nav = match to {
                    routes::EMAIL_SENDER => {
                        issue_pending_code(state, client.session_id, false).await?
                    }
                    routes::LOG_OUT => sign_out_flow(state, client.session_id).await?,
                    other => {
                        return Err(AccountsError::Internal(format!(
                            "no forward target for {other}"
                        )));
                    }
                };
            }
            Navigation::Redirect { to } | Navigation::RedirectWithNotice { to, .. } => {
                return Ok(redirect_response(to.to_string(), client.set_cookie));
            }
            Navigation::RedirectWithParam { to, param, value } => {
                return Ok(redirect_response(
                    format!("{to}?{param}={value}"),
                    client.set_cookie,
                ));
            }
        }
    }
}

/// Issue (or resend) a code for the session's pending email
async fn issue_pending_code<R, M>(
    state: &AccountsAppState<R, M>,
    session_id: Uuid,
    resend_requested: bool,
) -> AccountsResult<Navigation>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let Some(email) = state
        .store
        .get(session_id, session_keys::PENDING_EMAIL)
        .await?
    else {
        // No verification flow in progress; back to sign-in
        return Ok(Navigation::Redirect { to: routes::LOGIN });
    };

    let use_case = IssueCodeUseCase::new(
        state.store.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    let outcome = use_case.execute(&email, resend_requested).await?;

    navigation::route_outcome(outcome, routes::VERIFICATION, &*state.store, session_id).await
}

/// Destroy the session and compute the sign-out redirect
async fn sign_out_flow<R, M>(
    state: &AccountsAppState<R, M>,
    session_id: Uuid,
) -> AccountsResult<Navigation>
where
    R: AccountRepository + VerificationCodeStore + SessionStore + Clone + Send + Sync + 'static,
    M: MailSender + Clone + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.store.clone());
    let outcome = use_case.execute(session_id).await?;

    navigation::route_outcome(outcome, routes::LOGIN, &*state.store, session_id).await
}

// ============================================================================
// Response helpers
// ============================================================================

fn view_response(data: ViewDataResponse, set_cookie: Option<String>) -> Response {
    match set_cookie {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], Json(data)).into_response(),
        None => Json(data).into_response(),
    }
}

fn redirect_response(to: String, set_cookie: Option<String>) -> Response {
    let redirect = Redirect::to(&to);
    match set_cookie {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], redirect).into_response(),
        None => redirect.into_response(),
    }
}
