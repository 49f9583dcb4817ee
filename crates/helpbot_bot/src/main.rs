//! Telegram bot that collects team links and files.
//!
//! Paste a link (with optional `#tags`) to save it, search with `/search`
//! or browse with `/tag`, and share saved items from any chat through the
//! inline picker (`@bot query`).

mod callback;
mod commands;
mod config;
mod errors;
mod handlers;
mod render;
mod state;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use helpbot_core::{init_logging, open_db};
use log::{error, info};
use teloxide::prelude::*;

use crate::config::{Args, Config};
use crate::state::BotState;
use crate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let config = Config::from_args(Args::parse())?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let store = Store::new(conn);

    let bot = Bot::new(&config.bot_token);
    let me = match bot.get_me().await {
        Ok(me) => me,
        Err(err) => {
            error!("event=bot_auth module=bot status=error error={err}");
            return Err(err).context("failed to authenticate bot");
        }
    };
    info!(
        "event=bot_start module=bot status=ok username=@{} admins={} target_chat={}",
        me.username(),
        config.admins.len(),
        config.target_chat.is_some()
    );

    let state = BotState::new(store, config.admins, config.target_chat);

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![state, me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("event=bot_stop module=bot status=ok");
    Ok(())
}
