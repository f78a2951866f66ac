// src/repositories/postgres/user.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use curator_common::models::User;
use curator_common::Error;

use super::map_db_err;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), Error>;
    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error>;
    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, Error>;
    async fn update(&self, user: &User) -> Result<(), Error>;
    async fn delete(&self, user_id: Uuid) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<User>, Error>;
    async fn link_telegram_id(&self, user_id: Uuid, telegram_id: &str) -> Result<(), Error>;
    async fn unlink_telegram_id(&self, user_id: Uuid) -> Result<(), Error>;
}

pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for UserRepository {
    async fn create(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, username, email, password_hash,
                telegram_id, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.telegram_id)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password_hash,
                   telegram_id, is_active, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // Exact-match, case-sensitive lookup.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password_hash,
                   telegram_id, is_active, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password_hash,
                   telegram_id, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password_hash,
                   telegram_id, is_active, created_at, updated_at
            FROM users
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $1,
                email = $2,
                password_hash = $3,
                telegram_id = $4,
                is_active = $5,
                updated_at = $6
            WHERE user_id = $7
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.telegram_id)
        .bind(user.is_active)
        .bind(Utc::now())
        .bind(user.user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    // Cascades to the user's analyses via the FK.
    async fn delete(&self, user_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, Error> {
        // `User` derives `sqlx::FromRow`, so query_as maps rows directly.
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password_hash,
                   telegram_id, is_active, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn link_telegram_id(&self, user_id: Uuid, telegram_id: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET telegram_id = $1,
                updated_at = $2
            WHERE user_id = $3
            "#,
        )
        .bind(telegram_id)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn unlink_telegram_id(&self, user_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET telegram_id = NULL,
                updated_at = $1
            WHERE user_id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
