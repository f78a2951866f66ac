// curator-core/src/repositories/mod.rs

pub mod postgres;

pub use postgres::analysis::{AnalysisRepo, AnalysisRepository};
pub use postgres::chat_session::{ChatSessionRepo, ChatSessionRepository};
pub use postgres::user::{UserRepo, UserRepository};
