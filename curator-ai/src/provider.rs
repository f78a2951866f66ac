use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use curator_common::Error;

use crate::models::ProviderConfig;
use crate::traits::ModelProvider;

/// Gemini provider implementation
pub struct GeminiProvider {
    config: ProviderConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration.
    /// Fails with `Configuration` when no API key is set.
    pub fn new(config: ProviderConfig) -> Result<Self, Error> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }
        let client = Client::new();
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let api_base = self.config.api_base.clone().unwrap_or_else(|| {
            "https://generativelanguage.googleapis.com/v1beta".to_string()
        });

        let response = self.client
            .post(format!(
                "{}/models/{}:generateContent",
                api_base, self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }]
            }))
            .send()
            .await?;

        // Get the raw response text first for better error handling
        let response_text = response.text().await?;
        tracing::debug!("Raw API response: {}", response_text);

        let data = match serde_json::from_str::<serde_json::Value>(&response_text) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to parse API response as JSON: {:?}", e);
                return Err(anyhow::anyhow!("API returned non-JSON response: {}", e));
            }
        };

        // Check for API errors
        if let Some(error) = data.get("error") {
            let error_message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(anyhow::anyhow!("API error: {}", error_message));
        }

        let candidates = data["candidates"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Response missing 'candidates' array"))?;

        if candidates.is_empty() {
            return Err(anyhow::anyhow!("No completions returned"));
        }

        let text = candidates[0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format"))?
            .to_string();

        Ok(text)
    }
}
