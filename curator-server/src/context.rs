// curator-server/src/context.rs

use std::sync::Arc;

use curator_core::auth::AuthManager;
use curator_core::services::{AnalysisService, ChatSessionService};

use crate::telegram::TelegramBot;

/// Everything the request handlers need, constructed once at startup and
/// injected through axum state. No lazily-initialized globals.
pub struct ServerContext {
    pub auth: Arc<AuthManager>,
    pub analyses: Arc<AnalysisService>,
    pub chat: Arc<ChatSessionService>,
    pub bot: Option<Arc<TelegramBot>>,
}
