//! Runtime configuration for the bot process.
//!
//! Values come from command-line flags or the environment (a `.env` file is
//! loaded by `main` before parsing).

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use clap::Parser;
use helpbot_core::AdminSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use teloxide::types::ChatId;

const DEFAULT_DB_PATH: &str = "helpbot.sqlite3";

/// Telegram bot that collects team links and files behind an inline picker.
#[derive(Parser, Debug, Clone)]
#[command(name = "helpbot", author, version, about, long_about = None)]
pub struct Args {
    /// Bot API token from BotFather
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Comma-separated Telegram user ids allowed to run admin actions
    #[arg(long, env = "ADMIN_IDS", default_value = "")]
    pub admin_ids: String,

    /// Chat that receives broadcasts
    #[arg(long, env = "TARGET_CHAT_ID", allow_hyphen_values = true)]
    pub target_chat_id: Option<String>,

    /// SQLite database file
    #[arg(long, env = "DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Validated bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub admins: AdminSet,
    pub target_chat: Option<ChatId>,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingToken,
    InvalidTargetChat(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => {
                write!(f, "BOT_TOKEN not set. Create a .env with BOT_TOKEN=...")
            }
            Self::InvalidTargetChat(value) => {
                write!(f, "TARGET_CHAT_ID must be a numeric chat id, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let bot_token = args
            .bot_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let target_chat = match args.target_chat_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(ChatId(
                raw.parse::<i64>()
                    .map_err(|_| ConfigError::InvalidTargetChat(raw.to_string()))?,
            )),
        };

        Ok(Self {
            bot_token,
            admins: AdminSet::parse(&args.admin_ids),
            target_chat,
            db_path: args.db_path,
            log_level: args
                .log_level
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| helpbot_core::default_log_level().to_string()),
            log_dir: args.log_dir.filter(|dir| !dir.trim().is_empty()),
        })
    }
}
