// curator-core/src/services/chat_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

use curator_common::models::{ChatSession, User};
use curator_common::Error;

use crate::repositories::{ChatSessionRepo, UserRepo};

#[derive(Debug, Clone)]
struct CachedUser {
    user: User,
    last_access: DateTime<Utc>,
}

const CACHE_MAX_AGE_SECS: i64 = 24 * 3600;

/// Tracks Telegram identities and their optional link to an account.
/// Linked-user lookups are cached per chat id; the cache is invalidated on
/// connect/disconnect and pruned by age.
pub struct ChatSessionService {
    sessions: Arc<dyn ChatSessionRepo>,
    users: Arc<dyn UserRepo>,
    user_cache: DashMap<String, CachedUser>,
}

impl ChatSessionService {
    pub fn new(sessions: Arc<dyn ChatSessionRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self {
            sessions,
            users,
            user_cache: DashMap::new(),
        }
    }

    fn prune_cache(&self) {
        let now = Utc::now();
        let mut to_remove = Vec::new();
        for entry in self.user_cache.iter() {
            let age = now.signed_duration_since(entry.value().last_access);
            if age.num_seconds() >= CACHE_MAX_AGE_SECS {
                to_remove.push(entry.key().clone());
            }
        }
        for key in to_remove {
            self.user_cache.remove(&key);
        }
    }

    /// Record a contact from a Telegram identity: creates the session on
    /// first sight, refreshes names and `last_activity` afterwards.
    pub async fn touch(
        &self,
        telegram_id: &str,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<ChatSession, Error> {
        let session = ChatSession::new(telegram_id, username, first_name, last_name);
        self.sessions.upsert_contact(&session).await
    }

    /// Linked-account lookup for a chat identity, used by the bot's
    /// analyze/history commands on every update.
    pub async fn resolve_user(&self, telegram_id: &str) -> Result<Option<User>, Error> {
        self.prune_cache();

        if let Some(mut entry) = self.user_cache.get_mut(telegram_id) {
            entry.last_access = Utc::now();
            return Ok(Some(entry.user.clone()));
        }

        let user = self.users.get_by_telegram_id(telegram_id).await?;
        if let Some(ref u) = user {
            self.user_cache.insert(
                telegram_id.to_string(),
                CachedUser {
                    user: u.clone(),
                    last_access: Utc::now(),
                },
            );
        }
        Ok(user)
    }

    /// Link a chat identity to the account named `username`. Fails with
    /// `NotFound` for an unknown username and `Conflict` when the chat id
    /// already belongs to a different account.
    pub async fn connect(&self, telegram_id: &str, username: &str) -> Result<User, Error> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user '{}' not found", username)))?;

        if let Some(holder) = self.users.get_by_telegram_id(telegram_id).await? {
            if holder.user_id != user.user_id {
                return Err(Error::Conflict(
                    "telegram id is already linked to another account".to_string(),
                ));
            }
        }

        self.users.link_telegram_id(user.user_id, telegram_id).await?;
        self.sessions
            .set_user_link(telegram_id, Some(user.user_id))
            .await?;
        self.user_cache.remove(telegram_id);

        info!("Linked telegram id {} to user '{}'", telegram_id, username);

        self.users
            .get(user.user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user '{}' not found", username)))
    }

    /// Clear the link for a chat identity; returns whether one existed.
    pub async fn disconnect(&self, telegram_id: &str) -> Result<bool, Error> {
        match self.users.get_by_telegram_id(telegram_id).await? {
            Some(user) => {
                self.users.unlink_telegram_id(user.user_id).await?;
                self.sessions.set_user_link(telegram_id, None).await?;
                self.user_cache.remove(telegram_id);
                info!(
                    "Unlinked telegram id {} from user '{}'",
                    telegram_id, user.username
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
