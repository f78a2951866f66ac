// curator-server/src/routes/mod.rs

pub mod analysis;
pub mod auth;

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use curator_common::models::User;
use curator_common::Error;

use crate::context::ServerContext;
use crate::telegram;

pub fn router(context: Arc<ServerContext>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/token", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/analysis", post(analysis::create).get(analysis::list))
        .route(
            "/api/analysis/{id}",
            get(analysis::get_one).delete(analysis::delete_one),
        );

    if context.bot.is_some() {
        router = router.route("/webhook/telegram", post(telegram::webhook));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "curator" }))
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Boundary translation of the workspace error taxonomy into HTTP
/// responses. Internal causes are logged here and never leak to clients.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Analysis(cause) => {
                error!("Analysis failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "analysis failed, please try again".to_string(),
                )
            }
            other => {
                error!("Internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Pull the bearer token off the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError(Error::Unauthorized("missing bearer token".to_string())))
}

/// Re-validate the caller's token and resolve the account, on every call.
pub(crate) async fn require_user(
    context: &ServerContext,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let token = bearer_token(headers)?;
    Ok(context.auth.current_user(token).await?)
}
