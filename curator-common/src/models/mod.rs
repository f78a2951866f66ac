// File: curator-common/src/models/mod.rs
pub mod analysis;
pub mod chat_session;
pub mod user;

pub use analysis::{Analysis, AnalysisKind};
pub use chat_session::ChatSession;
pub use user::User;
