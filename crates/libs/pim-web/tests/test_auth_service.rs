use std::{sync::Arc, thread};

use chrono::{TimeDelta, Utc};
use common::TestContext;
use pim_auth::session_token::session_token_digest;
use pim_models::auth::{
    pim_session::{PimSession, PimSessionCreate},
    pim_user::PimUser,
};
use pim_auth::secret_hash::{generate_secret_hash, is_secret_valid};
use pim_web::{auth::AuthService, error::Error};

mod common;

#[test]
fn duplicate_registration_is_rejected() {
    let ctx = TestContext::new();

    let id = ctx.auth.register("alice", "correct").unwrap();
    let second = ctx.auth.register("alice", "other");

    assert!(matches!(second, Err(Error::DuplicateUser)));
    let stored = PimUser::fetch_by_username("alice", ctx.connection())
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, id);
    assert!(is_secret_valid("correct", &stored.hash));
}

#[test]
fn usernames_are_case_sensitive() {
    let ctx = TestContext::new();

    let lower = ctx.auth.register("alice", "pw").unwrap();
    let upper = ctx.auth.register("Alice", "pw").unwrap();

    assert_ne!(lower, upper);
    assert!(matches!(
        ctx.auth.login("ALICE", "pw"),
        Err(Error::InvalidCredentials)
    ));
}

#[test]
fn registration_requires_username_and_password() {
    let ctx = TestContext::new();

    assert!(matches!(ctx.auth.register("", "pw"), Err(Error::InvalidUsername)));
    assert!(matches!(
        ctx.auth.register("bob", ""),
        Err(Error::MissingCredentials)
    ));
}

#[test]
fn password_is_not_stored_in_plaintext() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    let stored = PimUser::fetch_by_username("alice", ctx.connection())
        .unwrap()
        .unwrap();
    assert_ne!(stored.hash, "correct");
}

#[test]
fn login_then_validate_returns_user() {
    let ctx = TestContext::new();
    let id = ctx.auth.register("alice", "correct").unwrap();

    let session = ctx.auth.login("alice", "correct").unwrap();

    assert_eq!(session.user_id, id);
    assert_eq!(ctx.auth.validate_session(&session.token).unwrap(), id);
    let lifetime = AuthService::DEFAULT_SESSION_LIFETIME.num_seconds();
    let remaining = session.expires_at - Utc::now().timestamp();
    assert!(remaining > lifetime - 60 && remaining <= lifetime);
}

#[test]
fn only_the_token_digest_is_stored() {
    let ctx = TestContext::new();
    let (id, token) = ctx.user_with_session("alice", "correct");

    let sessions = PimSession::fetch_by_user(id, ctx.connection()).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_ne!(sessions[0].token, token);
    assert_eq!(sessions[0].token, session_token_digest(&token));
}

#[test]
fn each_login_opens_another_session() {
    let ctx = TestContext::new();
    let (id, first) = ctx.user_with_session("alice", "correct");
    let second = ctx.auth.login("alice", "correct").unwrap().token;

    assert_ne!(first, second);
    assert_eq!(ctx.auth.validate_session(&first).unwrap(), id);
    assert_eq!(ctx.auth.validate_session(&second).unwrap(), id);
}

#[test]
fn unknown_user_and_wrong_password_fail_alike() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    let wrong_password = ctx.auth.login("alice", "wrong").unwrap_err();
    let unknown_user = ctx.auth.login("ghost", "anything").unwrap_err();

    assert!(matches!(wrong_password, Error::InvalidCredentials));
    assert!(matches!(unknown_user, Error::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status_code(), unknown_user.status_code());
}

#[test]
fn unknown_token_is_rejected() {
    let ctx = TestContext::new();
    ctx.user_with_session("alice", "correct");

    assert!(matches!(
        ctx.auth.validate_session("not-a-token"),
        Err(Error::InvalidOrExpiredSession)
    ));
    assert!(matches!(
        ctx.auth.validate_session(""),
        Err(Error::InvalidOrExpiredSession)
    ));
}

#[test]
fn expired_session_is_rejected_while_row_remains() {
    let ctx = TestContext::new();
    let id = ctx.auth.register("alice", "correct").unwrap();
    let token = "expired-session-token";
    let expiry = Utc::now().timestamp() - 1;
    PimSessionCreate::new(session_token_digest(token), id, expiry)
        .save(ctx.connection())
        .unwrap();

    assert!(matches!(
        ctx.auth.validate_session(token),
        Err(Error::InvalidOrExpiredSession)
    ));
    assert_eq!(PimSession::fetch_by_user(id, ctx.connection()).unwrap().len(), 1);
}

#[test]
fn negative_lifetime_issues_expired_sessions() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();
    let auth = ctx.auth.clone().with_session_lifetime(TimeDelta::seconds(-1));

    let session = auth.login("alice", "correct").unwrap();

    assert!(matches!(
        auth.validate_session(&session.token),
        Err(Error::InvalidOrExpiredSession)
    ));
}

#[test]
fn change_password_swaps_the_accepted_password() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    ctx.auth.change_password("alice", "correct", "new").unwrap();

    assert!(matches!(
        ctx.auth.login("alice", "correct"),
        Err(Error::InvalidCredentials)
    ));
    assert!(ctx.auth.login("alice", "new").is_ok());
}

#[test]
fn change_password_requires_current_password() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    assert!(matches!(
        ctx.auth.change_password("alice", "wrong", "new"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        ctx.auth.change_password("ghost", "correct", "new"),
        Err(Error::InvalidCredentials)
    ));
    assert!(ctx.auth.login("alice", "correct").is_ok());
}

#[test]
fn reset_password_needs_no_old_password() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "forgotten").unwrap();

    ctx.auth.reset_password("alice", "fresh").unwrap();

    assert!(ctx.auth.login("alice", "fresh").is_ok());
    assert!(ctx.auth.login("alice", "forgotten").is_err());
    assert!(matches!(
        ctx.auth.reset_password("ghost", "fresh"),
        Err(Error::UserNotFound)
    ));
}

#[test]
fn delete_user_invalidates_their_sessions() {
    let ctx = TestContext::new();
    let (id, token) = ctx.user_with_session("alice", "correct");
    let (_, other_token) = ctx.user_with_session("bob", "builder");

    ctx.auth.delete_user("alice", "correct").unwrap();

    assert!(matches!(
        ctx.auth.validate_session(&token),
        Err(Error::InvalidOrExpiredSession)
    ));
    assert!(PimSession::fetch_by_user(id, ctx.connection()).unwrap().is_empty());
    assert!(PimUser::fetch_by_id(id, ctx.connection()).unwrap().is_none());
    assert!(ctx.auth.validate_session(&other_token).is_ok());
}

#[test]
fn delete_user_requires_password() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    assert!(matches!(
        ctx.auth.delete_user("alice", "wrong"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        ctx.auth.delete_user("ghost", "correct"),
        Err(Error::InvalidCredentials)
    ));
    assert!(ctx.auth.get_user("alice").is_ok());
}

#[test]
fn deleted_username_can_be_registered_again_with_a_new_id() {
    let ctx = TestContext::new();
    let first = ctx.auth.register("alice", "correct").unwrap();
    ctx.auth.delete_user("alice", "correct").unwrap();

    let second = ctx.auth.register("alice", "again").unwrap();

    assert_ne!(first, second);
}

#[test]
fn get_user_hides_the_hash() {
    let ctx = TestContext::new();
    let id = ctx.auth.register("alice", "correct").unwrap();

    let user = ctx.auth.get_user("alice").unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.username, "alice");
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
    assert!(matches!(ctx.auth.get_user("ghost"), Err(Error::UserNotFound)));
}

#[test]
fn concurrent_registration_admits_exactly_one() {
    let ctx = TestContext::new();
    let auth = Arc::new(ctx.auth.clone());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let auth = Arc::clone(&auth);
            thread::spawn(move || auth.register("racer", &format!("password-{i}")))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, Error::DuplicateUser))
    );
}

#[test]
fn stale_user_id_never_updates_a_reregistered_name() {
    let ctx = TestContext::new();
    let stale = ctx.auth.register("alice", "old").unwrap();
    ctx.auth.delete_user("alice", "old").unwrap();
    let current = ctx.auth.register("alice", "x").unwrap();

    let hash = generate_secret_hash("chosen-by-old-owner").unwrap();
    let updated = PimUser::update_hash_by_id(stale, &hash, ctx.connection()).unwrap();

    assert!(!updated);
    assert_ne!(stale, current);
    assert!(ctx.auth.login("alice", "x").is_ok());
    assert!(matches!(
        ctx.auth.login("alice", "chosen-by-old-owner"),
        Err(Error::InvalidCredentials)
    ));
}

#[test]
fn missing_sessions_table_is_a_store_failure() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_with_session("alice", "correct");

    ctx.drop_table("sessions");

    assert!(matches!(
        ctx.auth.validate_session(&token),
        Err(Error::StoreUnavailable(_))
    ));
    assert!(matches!(
        ctx.auth.login("alice", "correct"),
        Err(Error::StoreUnavailable(_))
    ));
}

#[test]
fn missing_users_table_is_a_store_failure() {
    let ctx = TestContext::new();
    ctx.auth.register("alice", "correct").unwrap();

    ctx.drop_table("sessions");
    ctx.drop_table("auth");

    assert!(matches!(ctx.auth.get_user("alice"), Err(Error::StoreUnavailable(_))));
    assert!(matches!(
        ctx.auth.login("alice", "correct"),
        Err(Error::StoreUnavailable(_))
    ));
    assert!(matches!(
        ctx.auth.change_password("alice", "correct", "new"),
        Err(Error::StoreUnavailable(_))
    ));
}
