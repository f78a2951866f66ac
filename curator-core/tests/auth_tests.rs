// tests/auth_tests.rs

mod test_utils;

use std::sync::Arc;

use chrono::Duration;

use curator_common::Error;
use curator_core::auth::{AuthManager, TokenService};
use curator_core::repositories::UserRepo;

use crate::test_utils::{auth_manager, MockUserRepo};

#[tokio::test]
async fn register_login_current_user_round_trip() -> Result<(), Error> {
    let users = Arc::new(MockUserRepo::default());
    let auth = auth_manager(users.clone());

    let user = auth.register("alice", "a@x.com", "pw123").await?;
    assert_eq!(user.username, "alice");
    assert!(user.is_active);
    assert_ne!(user.password_hash, "pw123");

    let token = auth.login("alice", "pw123").await?;
    let resolved = auth.current_user(&token).await?;
    assert_eq!(resolved.user_id, user.user_id);

    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() -> Result<(), Error> {
    let auth = auth_manager(Arc::new(MockUserRepo::default()));

    auth.register("alice", "a@x.com", "pw123").await?;
    let err = auth
        .register("alice", "other@x.com", "pw456")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<(), Error> {
    let auth = auth_manager(Arc::new(MockUserRepo::default()));

    auth.register("alice", "a@x.com", "pw123").await?;
    let err = auth
        .register("bob", "a@x.com", "pw456")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let auth = auth_manager(Arc::new(MockUserRepo::default()));

    for email in ["not-an-email", "a@b", "a b@x.com", "@x.com", ""] {
        let err = auth.register("alice", email, "pw123").await.unwrap_err();
        assert!(
            matches!(err, Error::Validation(_)),
            "expected validation error for {:?}",
            email
        );
    }
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> Result<(), Error> {
    let auth = auth_manager(Arc::new(MockUserRepo::default()));
    auth.register("alice", "a@x.com", "pw123").await?;

    assert!(matches!(
        auth.login("alice", "wrong").await.unwrap_err(),
        Error::Unauthorized(_)
    ));
    assert!(matches!(
        auth.login("nobody", "pw123").await.unwrap_err(),
        Error::Unauthorized(_)
    ));

    Ok(())
}

#[tokio::test]
async fn username_lookup_is_case_sensitive() -> Result<(), Error> {
    let auth = auth_manager(Arc::new(MockUserRepo::default()));
    auth.register("alice", "a@x.com", "pw123").await?;

    assert!(matches!(
        auth.login("Alice", "pw123").await.unwrap_err(),
        Error::Unauthorized(_)
    ));

    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected_on_the_next_call() -> Result<(), Error> {
    let users = Arc::new(MockUserRepo::default());
    // ttl already in the past: every issued token is born expired
    let auth = AuthManager::new(
        users,
        TokenService::new("test-secret-key").unwrap(),
        Duration::seconds(-1),
    );

    auth.register("alice", "a@x.com", "pw123").await?;
    let token = auth.login("alice", "pw123").await?;

    assert!(matches!(
        auth.current_user(&token).await.unwrap_err(),
        Error::Unauthorized(_)
    ));

    Ok(())
}

#[tokio::test]
async fn deactivated_user_cannot_login_or_resolve() -> Result<(), Error> {
    let users = Arc::new(MockUserRepo::default());
    let auth = auth_manager(users.clone());

    let mut user = auth.register("alice", "a@x.com", "pw123").await?;
    let token = auth.login("alice", "pw123").await?;

    user.is_active = false;
    users.update(&user).await?;

    assert!(matches!(
        auth.login("alice", "pw123").await.unwrap_err(),
        Error::Unauthorized(_)
    ));
    assert!(matches!(
        auth.current_user(&token).await.unwrap_err(),
        Error::Unauthorized(_)
    ));

    Ok(())
}
