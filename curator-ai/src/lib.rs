pub mod gateway;
pub mod models;
pub mod provider;
pub mod traits;

// Re-export public APIs
pub use gateway::{AnalysisGateway, AnalysisOutcome};
pub use models::ProviderConfig;
pub use provider::GeminiProvider;
pub use traits::ModelProvider;
