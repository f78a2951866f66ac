// src/repositories/postgres/analysis.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use curator_common::models::{Analysis, AnalysisKind};
use curator_common::Error;

#[async_trait]
pub trait AnalysisRepo: Send + Sync {
    async fn create(&self, analysis: &Analysis) -> Result<(), Error>;

    /// Ownership-scoped fetch: `None` unless the row belongs to `user_id`.
    async fn get_for_user(
        &self,
        user_id: Uuid,
        analysis_id: Uuid,
    ) -> Result<Option<Analysis>, Error>;

    /// Newest-first page plus the total count, which ignores offset/limit.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<AnalysisKind>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Analysis>, i64), Error>;

    /// Ownership-scoped hard delete; returns whether a row was removed.
    async fn delete_for_user(&self, user_id: Uuid, analysis_id: Uuid) -> Result<bool, Error>;
}

#[derive(Clone)]
pub struct AnalysisRepository {
    pool: Pool<Postgres>,
}

impl AnalysisRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisRepo for AnalysisRepository {
    async fn create(&self, analysis: &Analysis) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO analyses (
                analysis_id, user_id, original_text, kind,
                result, confidence, processing_ms, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(analysis.analysis_id)
        .bind(analysis.user_id)
        .bind(&analysis.original_text)
        .bind(analysis.kind.to_string())
        .bind(&analysis.result)
        .bind(analysis.confidence)
        .bind(analysis.processing_ms)
        .bind(analysis.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_for_user(
        &self,
        user_id: Uuid,
        analysis_id: Uuid,
    ) -> Result<Option<Analysis>, Error> {
        let row = sqlx::query_as::<_, Analysis>(
            r#"
            SELECT analysis_id, user_id, original_text, kind,
                   result, confidence, processing_ms, created_at
            FROM analyses
            WHERE analysis_id = $1 AND user_id = $2
            "#,
        )
        .bind(analysis_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<AnalysisKind>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Analysis>, i64), Error> {
        let kind_str = kind.map(|k| k.to_string());

        let rows = sqlx::query_as::<_, Analysis>(
            r#"
            SELECT analysis_id, user_id, original_text, kind,
                   result, confidence, processing_ms, created_at
            FROM analyses
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR kind = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(&kind_str)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM analyses
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR kind = $2)
            "#,
        )
        .bind(user_id)
        .bind(&kind_str)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn delete_for_user(&self, user_id: Uuid, analysis_id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query(
            "DELETE FROM analyses WHERE analysis_id = $1 AND user_id = $2",
        )
        .bind(analysis_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
