// File: curator-core/tests/test_utils/mod.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use curator_ai::traits::ModelProvider;
use curator_common::models::{Analysis, AnalysisKind, ChatSession, User};
use curator_common::Error;
use curator_core::auth::{AuthManager, TokenService};
use curator_core::repositories::{AnalysisRepo, ChatSessionRepo, UserRepo};

/// In-memory user directory enforcing the same uniqueness rules the
/// database constraints arbitrate in production.
#[derive(Default)]
pub struct MockUserRepo {
    users: DashMap<Uuid, User>,
}

#[async_trait]
impl UserRepo for MockUserRepo {
    async fn create(&self, user: &User) -> Result<(), Error> {
        for entry in self.users.iter() {
            if entry.username == user.username {
                return Err(Error::Conflict("username already exists".to_string()));
            }
            if entry.email == user.email {
                return Err(Error::Conflict("email already exists".to_string()));
            }
            if user.telegram_id.is_some() && entry.telegram_id == user.telegram_id {
                return Err(Error::Conflict("telegram id is already linked".to_string()));
            }
        }
        self.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .iter()
            .find(|u| u.telegram_id.as_deref() == Some(telegram_id))
            .map(|u| u.value().clone()))
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        self.users.insert(user.user_id, updated);
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), Error> {
        self.users.remove(&user_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, Error> {
        let mut all: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn link_telegram_id(&self, user_id: Uuid, telegram_id: &str) -> Result<(), Error> {
        for entry in self.users.iter() {
            if entry.telegram_id.as_deref() == Some(telegram_id) && entry.user_id != user_id {
                return Err(Error::Conflict("telegram id is already linked".to_string()));
            }
        }
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.telegram_id = Some(telegram_id.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn unlink_telegram_id(&self, user_id: Uuid) -> Result<(), Error> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.telegram_id = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory analysis ledger with the repository's ordering semantics.
#[derive(Default)]
pub struct MockAnalysisRepo {
    analyses: DashMap<Uuid, Analysis>,
}

#[async_trait]
impl AnalysisRepo for MockAnalysisRepo {
    async fn create(&self, analysis: &Analysis) -> Result<(), Error> {
        self.analyses.insert(analysis.analysis_id, analysis.clone());
        Ok(())
    }

    async fn get_for_user(
        &self,
        user_id: Uuid,
        analysis_id: Uuid,
    ) -> Result<Option<Analysis>, Error> {
        Ok(self
            .analyses
            .get(&analysis_id)
            .filter(|a| a.user_id == user_id)
            .map(|a| a.value().clone()))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<AnalysisKind>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Analysis>, i64), Error> {
        let mut matching: Vec<Analysis> = self
            .analyses
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| kind.map_or(true, |k| a.kind == k))
            .map(|a| a.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page: Vec<Analysis> = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete_for_user(&self, user_id: Uuid, analysis_id: Uuid) -> Result<bool, Error> {
        let owned = self
            .analyses
            .get(&analysis_id)
            .map_or(false, |a| a.user_id == user_id);
        if owned {
            self.analyses.remove(&analysis_id);
        }
        Ok(owned)
    }
}

/// In-memory chat-session store keyed by telegram id.
#[derive(Default)]
pub struct MockChatSessionRepo {
    sessions: DashMap<String, ChatSession>,
}

#[async_trait]
impl ChatSessionRepo for MockChatSessionRepo {
    async fn upsert_contact(&self, session: &ChatSession) -> Result<ChatSession, Error> {
        let stored = match self.sessions.get(&session.telegram_id) {
            Some(existing) => {
                let mut refreshed = existing.clone();
                refreshed.username = session.username.clone();
                refreshed.first_name = session.first_name.clone();
                refreshed.last_name = session.last_name.clone();
                refreshed.is_active = true;
                refreshed.last_activity = session.last_activity;
                refreshed
            }
            None => session.clone(),
        };
        self.sessions
            .insert(stored.telegram_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<ChatSession>, Error> {
        Ok(self.sessions.get(telegram_id).map(|s| s.value().clone()))
    }

    async fn set_user_link(
        &self,
        telegram_id: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), Error> {
        if let Some(mut session) = self.sessions.get_mut(telegram_id) {
            session.user_id = user_id;
            session.last_activity = Utc::now();
        }
        Ok(())
    }
}

/// Provider returning a canned completion.
pub struct ScriptedProvider {
    pub reply: String,
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.reply.clone())
    }
}

/// Provider whose upstream always fails.
pub struct FailingProvider;

#[async_trait]
impl ModelProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("upstream unavailable"))
    }
}

pub fn auth_manager(users: Arc<MockUserRepo>) -> AuthManager {
    AuthManager::new(
        users,
        TokenService::new("test-secret-key").unwrap(),
        Duration::minutes(30),
    )
}
