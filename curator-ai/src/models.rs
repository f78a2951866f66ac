use serde::{Deserialize, Serialize};

/// Configuration for a text-completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for API requests
    pub api_base: Option<String>,

    /// Model to use with this provider
    pub model: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
            model: model.into(),
        }
    }
}
