//! Slash command handlers.

use crate::commands::{parse_item_id, Command};
use crate::errors::HandlerResult;
use crate::handlers::messages;
use crate::render;
use crate::state::BotState;
use helpbot_core::{
    items_csv_bytes, search_items, Actor, ItemServiceError, SearchQuery, EXPORT_FILE_NAME,
};
use log::info;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Me, ParseMode};

const COMMAND_RESULTS_LIMIT: u32 = 10;
const ADMINS_ONLY: &str = "Admins only.";

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    me: Me,
    state: BotState,
) -> HandlerResult {
    let actor = state.actor(msg.from.as_ref());
    let chat_id = msg.chat.id;

    match cmd {
        Command::Start => {
            bot.send_message(chat_id, render::welcome_text(me.username()))
                .parse_mode(ParseMode::Html)
                .reply_markup(render::picker_keyboard())
                .await?;
        }
        Command::Help => {
            bot.send_message(chat_id, render::help_text(me.username()))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Picker => {
            bot.send_message(chat_id, "Picker:")
                .reply_markup(render::picker_keyboard())
                .await?;
        }
        Command::Add(args) => {
            if args.trim().is_empty() {
                bot.send_message(chat_id, "Usage: /add <url> optional description with #tags")
                    .await?;
                return Ok(());
            }
            messages::save_text(&bot, &msg, &state, args).await?;
        }
        Command::Search(query) => search(&bot, chat_id, &state, query).await?,
        Command::Tag(args) => browse_tag(&bot, chat_id, &state, &args).await?,
        Command::Tags => {
            let tags = state
                .store
                .with_service(|service| service.list_tags())
                .await??;
            bot.send_message(chat_id, render::tags_reply(&tags))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Command::Export => export(&bot, chat_id, &state, actor).await?,
        Command::Delete(args) => {
            if !actor.is_admin {
                bot.send_message(chat_id, ADMINS_ONLY).await?;
                return Ok(());
            }
            let Some(id) = parse_item_id(&args) else {
                bot.send_message(chat_id, "Usage: /delete <id>").await?;
                return Ok(());
            };
            let reply = match state
                .store
                .with_service(move |service| service.delete_item(actor, id))
                .await?
            {
                Ok(true) => "Deleted.",
                Ok(false) => "Not found.",
                Err(ItemServiceError::Forbidden(_)) => ADMINS_ONLY,
                Err(err) => return Err(err.into()),
            };
            bot.send_message(chat_id, reply).await?;
        }
        Command::Broadcast(args) => broadcast(&bot, chat_id, &state, actor, &args).await?,
    }

    Ok(())
}

async fn search(bot: &Bot, chat_id: ChatId, state: &BotState, query: String) -> HandlerResult {
    let query = query.trim().to_string();
    if query.is_empty() {
        bot.send_message(chat_id, "Usage: /search <keywords>").await?;
        return Ok(());
    }

    let query_len = query.chars().count();
    let items = state
        .store
        .run(move |conn| search_items(conn, &SearchQuery::new(query).limit(COMMAND_RESULTS_LIMIT)))
        .await??;
    info!(
        "event=command_search module=bot status=ok query_len={query_len} results={}",
        items.len()
    );

    match render::results_keyboard(&items) {
        Some(keyboard) => {
            bot.send_message(chat_id, "<b>Results</b>:")
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, "No results.").await?;
        }
    }
    Ok(())
}

async fn browse_tag(bot: &Bot, chat_id: ChatId, state: &BotState, args: &str) -> HandlerResult {
    let Some(raw_tag) = args.split_whitespace().next() else {
        bot.send_message(chat_id, "Usage: /tag <tag>").await?;
        return Ok(());
    };
    let shown = raw_tag.trim_start_matches('#');

    let lookup = raw_tag.to_string();
    let page = state
        .store
        .with_service(move |service| {
            service.by_tag(&lookup, Some(COMMAND_RESULTS_LIMIT), 0)
        })
        .await?;
    let items = match page {
        Ok(page) => page.items,
        Err(ItemServiceError::InvalidTag(_)) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    match render::results_keyboard(&items) {
        Some(keyboard) => {
            bot.send_message(chat_id, render::tag_header(shown))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, render::no_tag_items_reply(shown))
                .await?;
        }
    }
    Ok(())
}

async fn export(bot: &Bot, chat_id: ChatId, state: &BotState, actor: Actor) -> HandlerResult {
    let items = match state
        .store
        .with_service(move |service| service.export_items(actor))
        .await?
    {
        Ok(items) => items,
        Err(ItemServiceError::Forbidden(_)) => {
            bot.send_message(chat_id, ADMINS_ONLY).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let bytes = items_csv_bytes(&items)?;
    info!(
        "event=export module=bot status=ok actor={} rows={} bytes={}",
        actor.user_id,
        items.len(),
        bytes.len()
    );
    bot.send_document(chat_id, InputFile::memory(bytes).file_name(EXPORT_FILE_NAME))
        .await?;
    Ok(())
}

async fn broadcast(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    actor: Actor,
    args: &str,
) -> HandlerResult {
    if !actor.is_admin {
        bot.send_message(chat_id, ADMINS_ONLY).await?;
        return Ok(());
    }
    let Some(target) = state.target_chat else {
        bot.send_message(chat_id, "No TARGET_CHAT_ID configured.")
            .await?;
        return Ok(());
    };
    let Some(id) = parse_item_id(args) else {
        bot.send_message(chat_id, "Usage: /broadcast <id>").await?;
        return Ok(());
    };

    let item = match state
        .store
        .with_service(move |service| service.item_for_broadcast(actor, id))
        .await?
    {
        Ok(item) => item,
        Err(ItemServiceError::NotFound(_)) => {
            bot.send_message(chat_id, "Item not found.").await?;
            return Ok(());
        }
        Err(ItemServiceError::Forbidden(_)) => {
            bot.send_message(chat_id, ADMINS_ONLY).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    bot.send_message(target, render::item_caption(&item))
        .parse_mode(ParseMode::Html)
        .await?;
    info!(
        "event=broadcast module=bot status=ok item_id={id} actor={}",
        actor.user_id
    );
    bot.send_message(chat_id, "Broadcasted.").await?;
    Ok(())
}
