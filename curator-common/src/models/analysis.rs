use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of annotations the curator can produce. Each kind carries
/// its own prompt template and confidence policy in the gateway, selected by
/// exhaustive match.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Sentiment,
    Summary,
    Keywords,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Sentiment => write!(f, "sentiment"),
            AnalysisKind::Summary => write!(f, "summary"),
            AnalysisKind::Keywords => write!(f, "keywords"),
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sentiment" => Ok(AnalysisKind::Sentiment),
            "summary" => Ok(AnalysisKind::Summary),
            "keywords" => Ok(AnalysisKind::Keywords),
            _ => Err(format!("Unknown analysis kind: {}", s)),
        }
    }
}

/// One user-submitted text plus its AI-derived result. Immutable once
/// created except for deletion.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Analysis {
    pub analysis_id: Uuid,
    pub user_id: Uuid,
    pub original_text: String,
    pub kind: AnalysisKind,
    pub result: String,
    /// Bounded [0,1] when present. Best-effort metadata for sentiment,
    /// a fixed constant for summary/keywords.
    pub confidence: Option<f64>,
    pub processing_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}
