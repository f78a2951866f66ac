use async_trait::async_trait;

/// Interface for a text-completion backend. The service is opaque: one
/// prompt in, one completion out, no streaming.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Get the provider's name
    fn name(&self) -> &str;

    /// Send a prompt and await a single synchronous completion.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
