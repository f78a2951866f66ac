// curator-core/src/services/analysis_service.rs

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use curator_ai::AnalysisGateway;
use curator_common::models::{Analysis, AnalysisKind, User};
use curator_common::Error;

use crate::repositories::AnalysisRepo;

/// Orchestrates one analysis round trip: validate, call the gateway,
/// persist the outcome through the ledger. The external call is awaited
/// without holding any lock or open transaction; the ledger write happens
/// afterwards in its own short transaction.
pub struct AnalysisService {
    gateway: Arc<AnalysisGateway>,
    analyses: Arc<dyn AnalysisRepo>,
}

impl AnalysisService {
    pub fn new(gateway: Arc<AnalysisGateway>, analyses: Arc<dyn AnalysisRepo>) -> Self {
        Self { gateway, analyses }
    }

    pub async fn analyze(
        &self,
        user: &User,
        text: &str,
        kind: AnalysisKind,
    ) -> Result<Analysis, Error> {
        if text.trim().is_empty() {
            return Err(Error::Validation("text must not be empty".to_string()));
        }

        let started = Instant::now();
        let outcome = self.gateway.analyze(kind, text).await?;
        let processing_ms = started.elapsed().as_millis() as i64;

        let analysis = Analysis {
            analysis_id: Uuid::new_v4(),
            user_id: user.user_id,
            original_text: text.to_string(),
            kind,
            result: outcome.result_text,
            confidence: outcome.confidence,
            processing_ms: Some(processing_ms),
            created_at: Utc::now(),
        };
        self.analyses.create(&analysis).await?;

        info!(
            "Recorded {} analysis {} for user '{}' in {}ms",
            kind, analysis.analysis_id, user.username, processing_ms
        );
        Ok(analysis)
    }

    pub async fn list(
        &self,
        user: &User,
        kind: Option<AnalysisKind>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Analysis>, i64), Error> {
        let offset = offset.max(0);
        let limit = limit.clamp(1, 100);
        self.analyses
            .list_for_user(user.user_id, kind, offset, limit)
            .await
    }

    pub async fn get(&self, user: &User, analysis_id: Uuid) -> Result<Analysis, Error> {
        self.analyses
            .get_for_user(user.user_id, analysis_id)
            .await?
            .ok_or_else(|| Error::NotFound("analysis not found".to_string()))
    }

    pub async fn delete(&self, user: &User, analysis_id: Uuid) -> Result<(), Error> {
        if self
            .analyses
            .delete_for_user(user.user_id, analysis_id)
            .await?
        {
            Ok(())
        } else {
            Err(Error::NotFound("analysis not found".to_string()))
        }
    }
}
