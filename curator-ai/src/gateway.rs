use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use curator_common::models::AnalysisKind;
use curator_common::Error;

use crate::traits::ModelProvider;

/// Summaries rely on the template's brevity constraint, so their confidence
/// is a fixed constant rather than parsed from the reply.
const SUMMARY_CONFIDENCE: f64 = 0.9;
const KEYWORDS_CONFIDENCE: f64 = 0.8;

/// Label the sentiment template asks the model to emit in front of its
/// numeric confidence.
const CONFIDENCE_LABEL: &str = "уверенность";

static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0\.\d+|\d+\.\d+").unwrap());

/// Structured result of one analysis round trip.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result_text: String,
    pub confidence: Option<f64>,
}

/// Formats prompts, calls the completion provider and parses its reply.
/// No retries, no caching; every call is a fresh network round trip capped
/// by `timeout`.
pub struct AnalysisGateway {
    provider: Arc<dyn ModelProvider>,
    timeout: Duration,
}

impl AnalysisGateway {
    pub fn new(provider: Arc<dyn ModelProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn analyze(
        &self,
        kind: AnalysisKind,
        text: &str,
    ) -> Result<AnalysisOutcome, Error> {
        let prompt = build_prompt(kind, text);
        debug!("Sending {} prompt to provider '{}'", kind, self.provider.name());

        let reply = match tokio::time::timeout(self.timeout, self.provider.complete(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!("Completion call failed for {} analysis: {:?}", kind, e);
                return Err(Error::Analysis(format!("{} analysis failed: {}", kind, e)));
            }
            Err(_) => {
                error!(
                    "Completion call for {} analysis timed out after {:?}",
                    kind, self.timeout
                );
                return Err(Error::Analysis(format!(
                    "{} analysis timed out after {:?}",
                    kind, self.timeout
                )));
            }
        };

        let result_text = reply.trim().to_string();
        let confidence = match kind {
            AnalysisKind::Sentiment => extract_confidence(&result_text),
            AnalysisKind::Summary => Some(SUMMARY_CONFIDENCE),
            AnalysisKind::Keywords => Some(KEYWORDS_CONFIDENCE),
        };

        Ok(AnalysisOutcome {
            result_text,
            confidence,
        })
    }
}

/// One fixed instruction template per kind, in the output language the
/// curator targets. Selected by exhaustive match.
pub fn build_prompt(kind: AnalysisKind, text: &str) -> String {
    match kind {
        AnalysisKind::Sentiment => format!(
            "Проанализируй тональность следующего текста на русском языке.\n\
             Определи эмоциональную окраску: позитивная, негативная или нейтральная.\n\
             Также оцени уверенность в анализе от 0 до 1.\n\
             \n\
             Текст для анализа:\n\
             \"{text}\"\n\
             \n\
             Ответь в следующем формате:\n\
             Тональность: [позитивная/негативная/нейтральная]\n\
             Уверенность: [число от 0 до 1]\n\
             Объяснение: [краткое объяснение почему такая тональность]"
        ),
        AnalysisKind::Summary => format!(
            "Создай краткое резюме следующего текста на русском языке.\n\
             Выдели основные мысли и ключевые моменты в 2-3 предложениях.\n\
             \n\
             Текст для резюмирования:\n\
             \"{text}\"\n\
             \n\
             Ответь кратким резюме без дополнительных пояснений."
        ),
        AnalysisKind::Keywords => format!(
            "Извлеки ключевые слова и основные темы из следующего текста на русском языке.\n\
             Выдели 5-10 наиболее важных слов и фраз, которые отражают суть текста.\n\
             \n\
             Текст для анализа:\n\
             \"{text}\"\n\
             \n\
             Ответь списком ключевых слов через запятую."
        ),
    }
}

/// Scan the reply for a line carrying the confidence label and pull the
/// first decimal out of it, clamped to [0,1]. Best-effort: no matching
/// line or no parsable number yields `None`, never an error.
pub fn extract_confidence(reply: &str) -> Option<f64> {
    for line in reply.lines() {
        if !line.to_lowercase().contains(CONFIDENCE_LABEL) {
            continue;
        }
        if let Some(m) = CONFIDENCE_RE.find(line) {
            if let Ok(value) = m.as_str().parse::<f64>() {
                return Some(value.clamp(0.0, 1.0));
            }
        }
    }
    None
}
