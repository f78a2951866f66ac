// curator-server/src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use curator_ai::{AnalysisGateway, GeminiProvider, ProviderConfig};
use curator_core::auth::{AuthManager, TokenService};
use curator_core::repositories::{
    AnalysisRepo, AnalysisRepository, ChatSessionRepo, ChatSessionRepository, UserRepo,
    UserRepository,
};
use curator_core::services::{AnalysisService, ChatSessionService};
use curator_core::{Database, Error};

mod context;
mod routes;
mod telegram;

use context::ServerContext;
use telegram::TelegramBot;

#[derive(Parser, Debug, Clone)]
#[command(name = "curator")]
#[command(author, version, about = "AI content curator - text analysis backend with a Telegram companion bot")]
struct Args {
    /// Address to which the HTTP server will bind
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind_addr: String,

    /// Postgres connection URL (DATABASE_URL overrides)
    #[arg(long, default_value = "postgres://curator@localhost:5432/curator")]
    db_url: String,

    /// Session token lifetime in minutes
    #[arg(long, default_value_t = 30)]
    token_ttl_minutes: i64,

    /// Completion model used for analyses
    #[arg(long, default_value = "gemini-pro")]
    model: String,

    /// Per-call timeout for the completion service, in seconds
    #[arg(long, default_value_t = 30)]
    analysis_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| args.db_url.clone());
    let jwt_secret = std::env::var("JWT_SECRET")
        .map_err(|_| Error::Configuration("JWT_SECRET is not set".to_string()))?;
    let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

    let db = Database::new(&database_url).await?;
    db.migrate().await?;

    let user_repo: Arc<dyn UserRepo> = Arc::new(UserRepository::new(db.pool().clone()));
    let analysis_repo: Arc<dyn AnalysisRepo> =
        Arc::new(AnalysisRepository::new(db.pool().clone()));
    let session_repo: Arc<dyn ChatSessionRepo> =
        Arc::new(ChatSessionRepository::new(db.pool().clone()));

    // Missing credentials fail here, at startup, not on the first request.
    let provider = GeminiProvider::new(ProviderConfig::new(gemini_api_key, args.model.clone()))?;
    let gateway = Arc::new(AnalysisGateway::new(
        Arc::new(provider),
        Duration::from_secs(args.analysis_timeout_secs),
    ));

    let auth = Arc::new(AuthManager::new(
        user_repo.clone(),
        TokenService::new(&jwt_secret)?,
        chrono::Duration::minutes(args.token_ttl_minutes),
    ));
    let analyses = Arc::new(AnalysisService::new(gateway, analysis_repo));
    let chat = Arc::new(ChatSessionService::new(session_repo, user_repo));

    let bot = match std::env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Some(Arc::new(TelegramBot::new(
            token,
            chat.clone(),
            analyses.clone(),
        ))),
        _ => {
            warn!("TELEGRAM_BOT_TOKEN is not set; Telegram webhook disabled");
            None
        }
    };

    let context = Arc::new(ServerContext {
        auth,
        analyses,
        chat,
        bot,
    });

    let app = routes::router(context);
    let addr: SocketAddr = args.bind_addr.parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
