// src/repositories/postgres/chat_session.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use curator_common::models::ChatSession;
use curator_common::Error;

#[async_trait]
pub trait ChatSessionRepo: Send + Sync {
    /// Insert on first contact, refresh display names and `last_activity`
    /// on every later one. The user link is left untouched here; it only
    /// changes through `set_user_link`.
    async fn upsert_contact(&self, session: &ChatSession) -> Result<ChatSession, Error>;

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<ChatSession>, Error>;

    async fn set_user_link(
        &self,
        telegram_id: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct ChatSessionRepository {
    pool: Pool<Postgres>,
}

impl ChatSessionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatSessionRepo for ChatSessionRepository {
    async fn upsert_contact(&self, session: &ChatSession) -> Result<ChatSession, Error> {
        let row = sqlx::query_as::<_, ChatSession>(
            r#"
            INSERT INTO chat_sessions (
                chat_session_id, telegram_id, user_id, username,
                first_name, last_name, is_active, created_at, last_activity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (telegram_id) DO UPDATE
            SET username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                is_active = TRUE,
                last_activity = EXCLUDED.last_activity
            RETURNING chat_session_id, telegram_id, user_id, username,
                      first_name, last_name, is_active, created_at, last_activity
            "#,
        )
        .bind(session.chat_session_id)
        .bind(&session.telegram_id)
        .bind(session.user_id)
        .bind(&session.username)
        .bind(&session.first_name)
        .bind(&session.last_name)
        .bind(session.is_active)
        .bind(session.created_at)
        .bind(session.last_activity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<ChatSession>, Error> {
        let row = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT chat_session_id, telegram_id, user_id, username,
                   first_name, last_name, is_active, created_at, last_activity
            FROM chat_sessions
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_user_link(
        &self,
        telegram_id: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE chat_sessions
            SET user_id = $1,
                last_activity = now()
            WHERE telegram_id = $2
            "#,
        )
        .bind(user_id)
        .bind(telegram_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
