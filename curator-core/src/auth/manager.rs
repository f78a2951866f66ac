// curator-core/src/auth/manager.rs

use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use curator_common::models::User;
use curator_common::Error;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::repositories::UserRepo;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Registration, login and token resolution over the user directory.
/// Constructed once at startup and injected into request handlers.
pub struct AuthManager {
    users: Arc<dyn UserRepo>,
    tokens: TokenService,
    token_ttl: Duration,
}

impl AuthManager {
    pub fn new(users: Arc<dyn UserRepo>, tokens: TokenService, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }

    /// Create an account. Uniqueness of username and email is arbitrated
    /// by the store; a violation surfaces as `Conflict`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, Error> {
        if username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(Error::Validation(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username, email, &password_hash);
        self.users.create(&user).await?;

        info!("Registered user '{}'", user.username);
        Ok(user)
    }

    /// Exchange credentials for a signed session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, Error> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::Unauthorized("invalid username or password".to_string()))?;

        if !user.is_active {
            return Err(Error::Unauthorized("account is deactivated".to_string()));
        }
        if !verify_password(password, &user.password_hash) {
            return Err(Error::Unauthorized("invalid username or password".to_string()));
        }

        self.tokens.issue(user.user_id, self.token_ttl)
    }

    /// Re-validate a token and resolve its subject. Called on every
    /// request; an invalid, expired or orphaned token always rejects.
    pub async fn current_user(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.validate(token)?;
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("unknown token subject".to_string()))?;

        if !user.is_active {
            return Err(Error::Unauthorized("account is deactivated".to_string()));
        }
        Ok(user)
    }
}
