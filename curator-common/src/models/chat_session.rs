use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per Telegram identity that has ever contacted the bot.
/// Created on first contact, refreshed on every interaction.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct ChatSession {
    pub chat_session_id: Uuid,
    pub telegram_id: String,
    /// Linked account, set by /connect and cleared by /disconnect.
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(
        telegram_id: &str,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Self {
        let now = Utc::now();
        Self {
            chat_session_id: Uuid::new_v4(),
            telegram_id: telegram_id.to_string(),
            user_id: None,
            username: username.map(String::from),
            first_name: first_name.map(String::from),
            last_name: last_name.map(String::from),
            is_active: true,
            created_at: now,
            last_activity: now,
        }
    }
}
