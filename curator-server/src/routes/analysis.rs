// curator-server/src/routes/analysis.rs

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use curator_common::models::{Analysis, AnalysisKind};
use curator_common::Error;

use crate::context::ServerContext;
use crate::routes::{require_user, ApiError};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisBody {
    pub analysis_id: Uuid,
    pub original_text: String,
    pub kind: AnalysisKind,
    pub result: String,
    pub confidence: Option<f64>,
    pub processing_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Analysis> for AnalysisBody {
    fn from(analysis: Analysis) -> Self {
        Self {
            analysis_id: analysis.analysis_id,
            original_text: analysis.original_text,
            kind: analysis.kind,
            result: analysis.result,
            confidence: analysis.confidence,
            processing_ms: analysis.processing_ms,
            created_at: analysis.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisListBody {
    pub analyses: Vec<AnalysisBody>,
    pub total: i64,
}

fn parse_kind(s: &str) -> Result<AnalysisKind, ApiError> {
    s.parse::<AnalysisKind>()
        .map_err(|e| ApiError(Error::Validation(e)))
}

pub async fn create(
    State(context): State<Arc<ServerContext>>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisBody>, ApiError> {
    let user = require_user(&context, &headers).await?;
    let kind = parse_kind(&req.kind)?;
    let analysis = context.analyses.analyze(&user, &req.text, kind).await?;
    Ok(Json(analysis.into()))
}

pub async fn list(
    State(context): State<Arc<ServerContext>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<AnalysisListBody>, ApiError> {
    let user = require_user(&context, &headers).await?;
    let kind = match &query.kind {
        Some(s) => Some(parse_kind(s)?),
        None => None,
    };
    let (items, total) = context
        .analyses
        .list(
            &user,
            kind,
            query.offset.unwrap_or(0),
            query.limit.unwrap_or(20),
        )
        .await?;
    Ok(Json(AnalysisListBody {
        analyses: items.into_iter().map(Into::into).collect(),
        total,
    }))
}

pub async fn get_one(
    State(context): State<Arc<ServerContext>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisBody>, ApiError> {
    let user = require_user(&context, &headers).await?;
    let analysis = context.analyses.get(&user, id).await?;
    Ok(Json(analysis.into()))
}

pub async fn delete_one(
    State(context): State<Arc<ServerContext>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&context, &headers).await?;
    context.analyses.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
