// curator-core/src/repositories/postgres/mod.rs

pub mod analysis;
pub mod chat_session;
pub mod user;

use curator_common::Error;

/// The store's unique-constraint enforcement is the final arbiter for
/// concurrent writes: a uniqueness violation surfaced at commit time maps
/// to `Conflict`, everything else stays a database error.
pub(crate) fn map_db_err(e: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            let what = match db.constraint() {
                Some("users_username_key") => "username already exists",
                Some("users_email_key") => "email already exists",
                Some("users_telegram_id_key") => "telegram id is already linked",
                Some("chat_sessions_telegram_id_key") => "chat session already exists",
                _ => "unique constraint violated",
            };
            return Error::Conflict(what.to_string());
        }
    }
    Error::Database(e)
}
