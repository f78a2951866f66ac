// curator-server/src/telegram.rs

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use curator_common::models::AnalysisKind;
use curator_common::Error;
use curator_core::services::{AnalysisService, ChatSessionService};

use crate::context::ServerContext;
use crate::routes::ApiError;

const HISTORY_PAGE: i64 = 5;

// Incoming webhook payload, reduced to the fields the bot acts on.

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<TgUser>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One parsed bot command. Plain text falls through to a default
/// sentiment analysis.
#[derive(Debug, PartialEq, Eq)]
enum BotCommand {
    Start,
    Help,
    Connect(String),
    Disconnect,
    Analyze(String),
    History,
    Unknown,
    Plain(String),
}

fn parse_command(text: &str) -> BotCommand {
    let text = text.trim();
    if !text.starts_with('/') {
        return BotCommand::Plain(text.to_string());
    }
    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (text, ""),
    };
    match command {
        "/start" => BotCommand::Start,
        "/help" => BotCommand::Help,
        "/connect" => BotCommand::Connect(rest.to_string()),
        "/disconnect" => BotCommand::Disconnect,
        "/analyze" => BotCommand::Analyze(rest.to_string()),
        "/history" => BotCommand::History,
        _ => BotCommand::Unknown,
    }
}

/// Split "/analyze <kind> <text>" arguments; `None` when either part is
/// missing or the kind is not one of the three supported values.
fn parse_analyze_args(rest: &str) -> Option<(AnalysisKind, String)> {
    let (kind, text) = rest.split_once(char::is_whitespace)?;
    let kind = kind.parse::<AnalysisKind>().ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some((kind, text.to_string()))
}

/// Command front-end over the core services. Holds no state of its own
/// beyond the outbound HTTP client; constructed once at startup.
pub struct TelegramBot {
    token: String,
    api_base: String,
    http: reqwest::Client,
    chat: Arc<ChatSessionService>,
    analyses: Arc<AnalysisService>,
}

impl TelegramBot {
    pub fn new(
        token: String,
        chat: Arc<ChatSessionService>,
        analyses: Arc<AnalysisService>,
    ) -> Self {
        Self {
            token,
            api_base: "https://api.telegram.org".to_string(),
            http: reqwest::Client::new(),
            chat,
            analyses,
        }
    }

    pub async fn handle_update(&self, update: Update) -> Result<(), Error> {
        tracing::debug!("Processing update {}", update.update_id);
        let Some(message) = update.message else {
            return Ok(());
        };
        let (Some(from), Some(text)) = (message.from, message.text) else {
            return Ok(());
        };
        let telegram_id = from.id.to_string();

        // Session bookkeeping happens on every interaction.
        self.chat
            .touch(
                &telegram_id,
                from.username.as_deref(),
                from.first_name.as_deref(),
                from.last_name.as_deref(),
            )
            .await?;

        let reply = match self.dispatch(&telegram_id, &text).await {
            Ok(reply) => reply,
            Err(e) => user_facing_error(&e),
        };
        self.send_message(message.chat.id, &reply).await
    }

    async fn dispatch(&self, telegram_id: &str, text: &str) -> Result<String, Error> {
        match parse_command(text) {
            BotCommand::Start => Ok("Привет! Я анализирую тексты с помощью ИИ: \
                 тональность, краткая выжимка, ключевые слова.\n\
                 Привяжите аккаунт командой /connect <username> и \
                 отправьте мне любой текст. Список команд: /help"
                .to_string()),
            BotCommand::Help => Ok("Команды:\n\
                 /connect <username> - привязать аккаунт\n\
                 /disconnect - отвязать аккаунт\n\
                 /analyze <sentiment|summary|keywords> <текст> - анализ текста\n\
                 /history - последние анализы\n\
                 Просто отправьте текст, и я определю его тональность."
                .to_string()),
            BotCommand::Connect(username) => {
                if username.is_empty() {
                    return Ok("Укажите имя пользователя: /connect <username>".to_string());
                }
                let user = self.chat.connect(telegram_id, &username).await?;
                Ok(format!("Аккаунт '{}' привязан к Telegram.", user.username))
            }
            BotCommand::Disconnect => {
                if self.chat.disconnect(telegram_id).await? {
                    Ok("Аккаунт отвязан от Telegram.".to_string())
                } else {
                    Ok("Аккаунт не был привязан.".to_string())
                }
            }
            BotCommand::Analyze(args) => match parse_analyze_args(&args) {
                Some((kind, text)) => self.run_analysis(telegram_id, kind, &text).await,
                None => Ok("Использование: /analyze <sentiment|summary|keywords> <текст>"
                    .to_string()),
            },
            BotCommand::History => self.history(telegram_id).await,
            BotCommand::Unknown => {
                Ok("Неизвестная команда. Список команд: /help".to_string())
            }
            BotCommand::Plain(text) => {
                self.run_analysis(telegram_id, AnalysisKind::Sentiment, &text)
                    .await
            }
        }
    }

    async fn run_analysis(
        &self,
        telegram_id: &str,
        kind: AnalysisKind,
        text: &str,
    ) -> Result<String, Error> {
        let Some(user) = self.chat.resolve_user(telegram_id).await? else {
            return Ok(
                "Сначала привяжите аккаунт: /connect <username>".to_string(),
            );
        };
        let analysis = self.analyses.analyze(&user, text, kind).await?;
        Ok(analysis.result)
    }

    async fn history(&self, telegram_id: &str) -> Result<String, Error> {
        let Some(user) = self.chat.resolve_user(telegram_id).await? else {
            return Ok(
                "Сначала привяжите аккаунт: /connect <username>".to_string(),
            );
        };
        let (items, total) = self
            .analyses
            .list(&user, None, 0, HISTORY_PAGE)
            .await?;
        if items.is_empty() {
            return Ok("История анализов пуста.".to_string());
        }
        let mut reply = format!("Последние анализы ({} всего):\n", total);
        for analysis in items {
            reply.push_str(&format!(
                "- [{}] {}\n",
                analysis.kind,
                truncate(&analysis.original_text, 60)
            ));
        }
        Ok(reply)
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), Error> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("sendMessage returned {}", response.status());
        }
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}

/// What the chat user sees when a command fails. Internal causes stay in
/// the server logs.
fn user_facing_error(e: &Error) -> String {
    match e {
        Error::NotFound(msg) => format!("Не найдено: {}", msg),
        Error::Conflict(_) => {
            "Этот Telegram уже привязан к другому аккаунту.".to_string()
        }
        Error::Validation(msg) => format!("Некорректный запрос: {}", msg),
        Error::Analysis(_) => {
            "Не удалось выполнить анализ. Попробуйте позже.".to_string()
        }
        _ => "Произошла ошибка. Попробуйте позже.".to_string(),
    }
}

pub async fn webhook(
    State(context): State<Arc<ServerContext>>,
    Json(update): Json<Update>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(bot) = context.bot.as_ref() else {
        return Err(ApiError(Error::Configuration(
            "telegram bot is not configured".to_string(),
        )));
    };
    if let Err(e) = bot.handle_update(update).await {
        error!("Webhook handling failed: {}", e);
        return Err(ApiError(e));
    }
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_into_variants() {
        assert_eq!(parse_command("/start"), BotCommand::Start);
        assert_eq!(parse_command("  /help  "), BotCommand::Help);
        assert_eq!(
            parse_command("/connect alice"),
            BotCommand::Connect("alice".to_string())
        );
        assert_eq!(parse_command("/connect"), BotCommand::Connect(String::new()));
        assert_eq!(parse_command("/disconnect"), BotCommand::Disconnect);
        assert_eq!(parse_command("/history"), BotCommand::History);
        assert_eq!(parse_command("/frobnicate"), BotCommand::Unknown);
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(
            parse_command("Отличный продукт!"),
            BotCommand::Plain("Отличный продукт!".to_string())
        );
    }

    #[test]
    fn analyze_args_need_a_kind_and_a_text() {
        assert_eq!(
            parse_analyze_args("sentiment Отличный продукт!"),
            Some((AnalysisKind::Sentiment, "Отличный продукт!".to_string()))
        );
        assert_eq!(
            parse_analyze_args("summary длинный текст для сокращения"),
            Some((
                AnalysisKind::Summary,
                "длинный текст для сокращения".to_string()
            ))
        );
        assert_eq!(parse_analyze_args("sentiment"), None);
        assert_eq!(parse_analyze_args("translation some text"), None);
        assert_eq!(parse_analyze_args(""), None);
    }

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate("short", 60), "short");
        let long = "x".repeat(100);
        assert_eq!(truncate(&long, 60).chars().count(), 61);
    }
}
