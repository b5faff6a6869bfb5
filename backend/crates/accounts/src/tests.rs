//! Workflow tests against the in-memory store
//!
//! Every flow runs through the same use cases the HTTP layer calls,
//! with the in-memory store standing in for PostgreSQL and recording
//! fakes standing in for mail delivery.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::{
    AccountsConfig, CloseAccountUseCase, IssueCodeUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, SignUpInput, SignUpUseCase, VerifyCodeUseCase,
};
use crate::domain::credential_rules::CredentialViolation;
use crate::domain::outcome::Outcome;
use crate::domain::repository::{
    AccountRepository, MailError, MailSender, SessionStore, session_keys,
};
use crate::infra::memory::MemoryStore;
use crate::presentation::messages::{self, NoticeCategory};
use crate::presentation::navigation::{Navigation, route_outcome};
use crate::presentation::routes;

// ============================================================================
// Test doubles and harness
// ============================================================================

#[derive(Debug, Clone)]
struct SentMail {
    to: String,
    body: String,
}

/// Mail sender that records every delivery
#[derive(Clone, Default)]
struct RecordingMailSender {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailSender {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Plaintext code carried by the most recent mail
    fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.body.clone())
    }

    fn codes(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.body.clone()).collect()
    }

    fn last_recipient(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.to.clone())
    }
}

impl MailSender for RecordingMailSender {
    async fn send(&self, to_email: &str, _subject: &str, body: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to_email.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Mail sender whose every delivery fails
#[derive(Clone, Default)]
struct FailingMailSender;

impl MailSender for FailingMailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), MailError> {
        Err(MailError("smtp connection refused".to_string()))
    }
}

/// One store, one mailer, and the use cases wired the way the handlers
/// wire them
struct Harness {
    store: MemoryStore,
    mailer: RecordingMailSender,
    config: Arc<AccountsConfig>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            mailer: RecordingMailSender::default(),
            config: Arc::new(AccountsConfig::development()),
        }
    }

    async fn register(&self, username: &str, password: &str, email: &str) -> Outcome {
        SignUpUseCase::new(Arc::new(self.store.clone()))
            .execute(SignUpInput {
                username: username.to_string(),
                password: password.to_string(),
                email: email.to_string(),
            })
            .await
            .unwrap()
    }

    async fn sign_in(&self, username: &str, password: &str) -> Outcome {
        SignInUseCase::new(Arc::new(self.store.clone()))
            .execute(SignInInput {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    async fn issue(&self, email: &str, resend_requested: bool) -> Outcome {
        IssueCodeUseCase::new(
            Arc::new(self.store.clone()),
            Arc::new(self.mailer.clone()),
            self.config.clone(),
        )
        .execute(email, resend_requested)
        .await
        .unwrap()
    }

    async fn verify(&self, email: &str, code: &str) -> Outcome {
        VerifyCodeUseCase::new(Arc::new(self.store.clone()), Arc::new(self.store.clone()))
            .execute(email, code)
            .await
            .unwrap()
    }

    async fn close(&self, username: &str) -> Outcome {
        CloseAccountUseCase::new(Arc::new(self.store.clone()))
            .execute(username)
            .await
            .unwrap()
    }

    /// Register, issue, and consume a code so the account is active
    async fn register_activated(&self, username: &str, password: &str, email: &str) {
        assert!(matches!(
            self.register(username, password, email).await,
            Outcome::Registered { .. }
        ));
        assert_eq!(self.issue(email, false).await, Outcome::CodeSent);
        let code = self.mailer.last_code().unwrap();
        assert!(matches!(
            self.verify(email, &code).await,
            Outcome::CodeValid { .. }
        ));
    }
}

// ============================================================================
// Registration and sign-in
// ============================================================================

mod registration_and_sign_in {
    use super::*;

    #[tokio::test]
    async fn test_fresh_registration_is_unverified_until_code_consumed() {
        let h = Harness::new();

        assert_eq!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered {
                email: "a@b.com".to_string()
            }
        );

        // Correct credentials, but no code consumed yet
        assert_eq!(
            h.sign_in("user1", "Abcd1!").await,
            Outcome::AccountUnverified {
                email: "a@b.com".to_string()
            }
        );

        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);
        let code = h.mailer.last_code().unwrap();
        assert_eq!(
            h.verify("a@b.com", &code).await,
            Outcome::CodeValid {
                email: "a@b.com".to_string()
            }
        );

        assert_eq!(
            h.sign_in("user1", "Abcd1!").await,
            Outcome::Authenticated {
                username: "user1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_validation_failure_has_no_side_effects() {
        let h = Harness::new();

        assert_eq!(
            h.register("user1", "Abcd1!", "not-an-email").await,
            Outcome::InputInvalid(CredentialViolation::BadEmail)
        );
        assert_eq!(
            h.register("", "", "").await,
            Outcome::InputInvalid(CredentialViolation::EmptyFields)
        );

        // Nothing was persisted
        assert!(
            h.store.find_by_username("user1").await.unwrap().is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let h = Harness::new();

        assert!(matches!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered { .. }
        ));
        assert_eq!(
            h.register("user1", "Efgh2@", "other@b.com").await,
            Outcome::RegistrationConflict
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let h = Harness::new();

        assert!(matches!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered { .. }
        ));
        assert_eq!(
            h.register("user2", "Efgh2@", "a@b.com").await,
            Outcome::RegistrationConflict
        );
    }

    #[tokio::test]
    async fn test_concurrent_registrations_with_same_email() {
        let h = Harness::new();

        let (first, second) = tokio::join!(
            h.register("user1", "Abcd1!", "a@b.com"),
            h.register("user2", "Efgh2@", "a@b.com"),
        );

        let registered = [&first, &second]
            .iter()
            .filter(|o| matches!(o, Outcome::Registered { .. }))
            .count();
        let conflicts = [&first, &second]
            .iter()
            .filter(|o| matches!(o, Outcome::RegistrationConflict))
            .count();

        assert_eq!(registered, 1, "exactly one registration may win");
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let h = Harness::new();
        h.register_activated("user1", "Abcd1!", "a@b.com").await;

        let unknown = h.sign_in("ghost1", "Abcd1!").await;
        let wrong = h.sign_in("user1", "Dcba1!").await;

        assert_eq!(unknown, Outcome::AuthenticationFailed);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_closed_account_beats_activation_state() {
        let h = Harness::new();

        // Closed after activation: active=false, deleted=true
        h.register_activated("user1", "Abcd1!", "a@b.com").await;
        assert_eq!(h.close("user1").await, Outcome::AccountClosed);
        assert_eq!(h.sign_in("user1", "Abcd1!").await, Outcome::AccountDeleted);

        // Closed while still unverified: the deleted flag must win over
        // the unverified state
        assert!(matches!(
            h.register("user2", "Efgh2@", "b@c.com").await,
            Outcome::Registered { .. }
        ));
        assert_eq!(h.close("user2").await, Outcome::AccountClosed);
        assert_eq!(h.sign_in("user2", "Efgh2@").await, Outcome::AccountDeleted);
    }

    #[tokio::test]
    async fn test_closing_never_leaves_active_and_deleted() {
        let h = Harness::new();
        h.register_activated("user1", "Abcd1!", "a@b.com").await;
        h.close("user1").await;

        let account = h.store.find_by_username("user1").await.unwrap().unwrap();
        assert!(account.deleted);
        assert!(!account.active);
    }
}

// ============================================================================
// Verification codes
// ============================================================================

mod verification {
    use super::*;

    #[tokio::test]
    async fn test_full_verification_scenario() {
        let h = Harness::new();

        assert!(matches!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered { .. }
        ));

        // Issue: exactly one live code, mailed to the right address
        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);
        assert_eq!(h.store.code_count(), 1);
        assert_eq!(h.mailer.last_recipient().as_deref(), Some("a@b.com"));

        // Wrong code leaves the stored code untouched
        assert_eq!(h.verify("a@b.com", "000000").await, Outcome::CodeInvalid);
        assert_eq!(h.store.code_count(), 1);
        let account = h.store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(!account.active);

        // Right code activates and consumes
        let code = h.mailer.last_code().unwrap();
        assert_eq!(
            h.verify("a@b.com", &code).await,
            Outcome::CodeValid {
                email: "a@b.com".to_string()
            }
        );
        let account = h.store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(account.active);
        assert_eq!(h.store.code_count(), 0);
    }

    #[tokio::test]
    async fn test_code_cannot_be_consumed_twice() {
        let h = Harness::new();
        assert!(matches!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered { .. }
        ));
        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);

        let code = h.mailer.last_code().unwrap();
        assert!(matches!(
            h.verify("a@b.com", &code).await,
            Outcome::CodeValid { .. }
        ));
        // Replaying the consumed code must not re-activate anything
        assert_eq!(h.verify("a@b.com", &code).await, Outcome::CodeInvalid);
    }

    #[tokio::test]
    async fn test_second_issue_without_resend_reports_pending() {
        let h = Harness::new();
        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);
        assert_eq!(h.mailer.sent_count(), 1);

        // The live code stays; no new mail goes out
        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodePending);
        assert_eq!(h.mailer.sent_count(), 1);
        assert_eq!(h.store.code_count(), 1);
    }

    #[tokio::test]
    async fn test_resend_replaces_the_live_code() {
        let h = Harness::new();
        assert!(matches!(
            h.register("user1", "Abcd1!", "a@b.com").await,
            Outcome::Registered { .. }
        ));

        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);
        assert_eq!(h.issue("a@b.com", true).await, Outcome::CodeResent);

        // Exactly one live code afterwards
        assert_eq!(h.store.code_count(), 1);
        assert_eq!(h.mailer.sent_count(), 2);

        let codes = h.mailer.codes();
        let (first, second) = (&codes[0], &codes[1]);

        // The first code is dead unless the generator happened to draw
        // the same six digits twice
        if first != second {
            assert_eq!(h.verify("a@b.com", first).await, Outcome::CodeInvalid);
        }
        assert!(matches!(
            h.verify("a@b.com", second).await,
            Outcome::CodeValid { .. }
        ));
    }

    #[tokio::test]
    async fn test_delivery_failure_leaves_no_orphaned_code() {
        let h = Harness::new();
        let failing = IssueCodeUseCase::new(
            Arc::new(h.store.clone()),
            Arc::new(FailingMailSender),
            h.config.clone(),
        );

        assert_eq!(
            failing.execute("a@b.com", false).await.unwrap(),
            Outcome::CodeSendFailed
        );
        assert_eq!(h.store.code_count(), 0);

        // The next attempt starts clean and can succeed
        assert_eq!(h.issue("a@b.com", false).await, Outcome::CodeSent);
        assert_eq!(h.store.code_count(), 1);
    }

    #[tokio::test]
    async fn test_verify_with_no_code_on_file() {
        let h = Harness::new();
        assert_eq!(h.verify("a@b.com", "123456").await, Outcome::CodeInvalid);
    }
}

// ============================================================================
// Outcome routing
// ============================================================================

mod outcome_routing {
    use super::*;

    async fn route(
        store: &MemoryStore,
        session_id: Uuid,
        outcome: Outcome,
        origin: &'static str,
    ) -> Navigation {
        route_outcome(outcome, origin, store, session_id).await.unwrap()
    }

    #[tokio::test]
    async fn test_input_invalid_routes_back_to_origin() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(
            &store,
            sid,
            Outcome::InputInvalid(CredentialViolation::EmptyFields),
            routes::REGISTRATION,
        )
        .await;

        assert_eq!(
            nav,
            Navigation::RedirectWithNotice {
                to: routes::REGISTRATION,
                category: NoticeCategory::Validation,
                notice: messages::EMPTY_FIELDS,
            }
        );
        assert_eq!(
            store.get(sid, session_keys::VALIDATION_NOTICE).await.unwrap(),
            Some(messages::EMPTY_FIELDS.to_string())
        );
    }

    #[tokio::test]
    async fn test_notices_are_read_once() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        route(&store, sid, Outcome::AuthenticationFailed, routes::LOGIN).await;

        assert_eq!(
            store.take(sid, session_keys::LOGIN_NOTICE).await.unwrap(),
            Some(messages::FAILED_AUTHENTICATION.to_string())
        );
        // Gone after one take
        assert_eq!(store.take(sid, session_keys::LOGIN_NOTICE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_and_deleted_both_land_on_login() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(&store, sid, Outcome::AuthenticationFailed, routes::LOGIN).await;
        assert!(matches!(
            nav,
            Navigation::RedirectWithNotice {
                to: routes::LOGIN,
                category: NoticeCategory::Login,
                ..
            }
        ));

        let nav = route(&store, sid, Outcome::AccountDeleted, routes::LOGIN).await;
        assert!(matches!(
            nav,
            Navigation::RedirectWithNotice {
                to: routes::LOGIN,
                category: NoticeCategory::Login,
                notice: messages::DELETED_ACCOUNT,
            }
        ));
    }

    #[tokio::test]
    async fn test_unverified_forwards_with_email_in_session() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(
            &store,
            sid,
            Outcome::AccountUnverified {
                email: "a@b.com".to_string(),
            },
            routes::LOGIN,
        )
        .await;

        assert_eq!(
            nav,
            Navigation::Forward {
                to: routes::EMAIL_SENDER
            }
        );
        // Carried in the session, not shown as a notice
        assert_eq!(
            store.get(sid, session_keys::PENDING_EMAIL).await.unwrap(),
            Some("a@b.com".to_string())
        );
        assert_eq!(
            store.get(sid, session_keys::VERIFICATION_NOTICE).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_registered_forwards_to_code_issuance() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(
            &store,
            sid,
            Outcome::Registered {
                email: "a@b.com".to_string(),
            },
            routes::REGISTRATION,
        )
        .await;

        assert_eq!(
            nav,
            Navigation::Forward {
                to: routes::EMAIL_SENDER
            }
        );
        assert_eq!(
            store.get(sid, session_keys::PENDING_EMAIL).await.unwrap(),
            Some("a@b.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_authenticated_sets_markers_and_clears_notices() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        // A notice left over from an earlier failed attempt
        route(&store, sid, Outcome::AuthenticationFailed, routes::LOGIN).await;

        let nav = route(
            &store,
            sid,
            Outcome::Authenticated {
                username: "user1".to_string(),
            },
            routes::LOGIN,
        )
        .await;

        assert_eq!(
            nav,
            Navigation::Redirect {
                to: routes::USER_PAGE
            }
        );
        assert_eq!(
            store.get(sid, session_keys::USERNAME).await.unwrap(),
            Some("user1".to_string())
        );
        assert!(store.get(sid, session_keys::LOGGED_IN).await.unwrap().is_some());
        // Stale notices are gone
        assert_eq!(store.get(sid, session_keys::LOGIN_NOTICE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_code_outcomes_route_to_verification() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        for (outcome, notice) in [
            (Outcome::CodeSent, messages::CODE_SENT),
            (Outcome::CodeResent, messages::CODE_RESENT),
            (Outcome::CodePending, messages::CODE_PENDING),
            (Outcome::CodeSendFailed, messages::CODE_SEND_FAILED),
            (Outcome::CodeInvalid, messages::CODE_INVALID),
        ] {
            let nav = route(&store, sid, outcome, routes::VERIFICATION).await;
            assert_eq!(
                nav,
                Navigation::RedirectWithNotice {
                    to: routes::VERIFICATION,
                    category: NoticeCategory::Verification,
                    notice,
                }
            );
            assert_eq!(
                store.take(sid, session_keys::VERIFICATION_NOTICE).await.unwrap(),
                Some(notice.to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_code_valid_routes_to_login_and_clears_pending_email() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();
        store
            .put(sid, session_keys::PENDING_EMAIL, "a@b.com")
            .await
            .unwrap();

        let nav = route(
            &store,
            sid,
            Outcome::CodeValid {
                email: "a@b.com".to_string(),
            },
            routes::VERIFICATION,
        )
        .await;

        assert_eq!(
            nav,
            Navigation::RedirectWithNotice {
                to: routes::LOGIN,
                category: NoticeCategory::Login,
                notice: messages::ACCOUNT_ACTIVATED,
            }
        );
        assert_eq!(store.get(sid, session_keys::PENDING_EMAIL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deletion_forwards_into_sign_out() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(&store, sid, Outcome::AccountClosed, routes::CLOSE_ACCOUNT).await;
        assert_eq!(nav, Navigation::Forward { to: routes::LOG_OUT });
        assert!(
            store
                .get(sid, session_keys::ACCOUNT_CLOSED)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_logged_out_carries_notice_code_in_param() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        let nav = route(
            &store,
            sid,
            Outcome::LoggedOut {
                account_closed: false,
            },
            routes::LOG_OUT,
        )
        .await;
        assert_eq!(
            nav,
            Navigation::RedirectWithParam {
                to: routes::LOGIN,
                param: "notice",
                value: messages::SIGNED_OUT_CODE,
            }
        );

        let nav = route(
            &store,
            sid,
            Outcome::LoggedOut {
                account_closed: true,
            },
            routes::LOG_OUT,
        )
        .await;
        assert_eq!(
            nav,
            Navigation::RedirectWithParam {
                to: routes::LOGIN,
                param: "notice",
                value: messages::ACCOUNT_CLOSED_CODE,
            }
        );
    }
}

// ============================================================================
// Sign-out
// ============================================================================

mod sign_out {
    use super::*;

    #[tokio::test]
    async fn test_sign_out_destroys_session_state() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        store.put(sid, session_keys::LOGGED_IN, "true").await.unwrap();
        store.put(sid, session_keys::USERNAME, "user1").await.unwrap();

        let outcome = SignOutUseCase::new(Arc::new(store.clone()))
            .execute(sid)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::LoggedOut {
                account_closed: false
            }
        );
        assert_eq!(store.get(sid, session_keys::LOGGED_IN).await.unwrap(), None);
        assert_eq!(store.get(sid, session_keys::USERNAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_after_deletion_reports_it() {
        let store = MemoryStore::new();
        let sid = Uuid::new_v4();

        store
            .put(sid, session_keys::ACCOUNT_CLOSED, "true")
            .await
            .unwrap();

        let outcome = SignOutUseCase::new(Arc::new(store.clone()))
            .execute(sid)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::LoggedOut {
                account_closed: true
            }
        );
    }
}
