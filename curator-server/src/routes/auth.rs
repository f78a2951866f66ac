// curator-server/src/routes/auth.rs

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use curator_common::models::User;

use crate::context::ServerContext;
use crate::routes::{require_user, ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user; the password hash stays server-side.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub telegram_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            telegram_id: user.telegram_id,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub access_token: String,
    pub token_type: String,
}

pub async fn register(
    State(context): State<Arc<ServerContext>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserBody>, ApiError> {
    let user = context
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok(Json(user.into()))
}

pub async fn login(
    State(context): State<Arc<ServerContext>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenBody>, ApiError> {
    let access_token = context.auth.login(&req.username, &req.password).await?;
    Ok(Json(TokenBody {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(
    State(context): State<Arc<ServerContext>>,
    headers: HeaderMap,
) -> Result<Json<UserBody>, ApiError> {
    let user = require_user(&context, &headers).await?;
    Ok(Json(user.into()))
}
