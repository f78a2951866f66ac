// curator-core/src/services/mod.rs

pub mod analysis_service;
pub mod chat_service;

pub use analysis_service::AnalysisService;
pub use chat_service::ChatSessionService;
