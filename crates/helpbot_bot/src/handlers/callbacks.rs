//! Inline keyboard button presses.

use crate::callback::CallbackAction;
use crate::errors::HandlerResult;
use crate::render;
use crate::state::BotState;
use helpbot_core::ItemServiceError;
use log::{info, warn};
use teloxide::prelude::*;
use teloxide::types::ParseMode;

pub async fn on_callback(bot: Bot, q: CallbackQuery, state: BotState) -> HandlerResult {
    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        warn!("event=callback module=bot status=ignored reason=malformed_data");
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };
    let actor = state.actor(Some(&q.from));

    if matches!(action, CallbackAction::Broadcast(_)) && !actor.is_admin {
        bot.answer_callback_query(&q.id)
            .text("Admins only.")
            .await?;
        return Ok(());
    }
    bot.answer_callback_query(&q.id).await?;

    let Some(message) = q.regular_message() else {
        return Ok(());
    };
    let (chat_id, message_id) = (message.chat.id, message.id);

    match action {
        CallbackAction::Open(id) => {
            let item = state
                .store
                .with_service(move |service| service.get_item(id))
                .await??;
            match item {
                Some(item) => {
                    bot.edit_message_text(chat_id, message_id, render::item_caption(&item))
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
                None => {
                    bot.edit_message_text(chat_id, message_id, "Item not found.")
                        .await?;
                }
            }
        }
        CallbackAction::Broadcast(id) => {
            let Some(target) = state.target_chat else {
                bot.edit_message_text(chat_id, message_id, "No TARGET_CHAT_ID configured.")
                    .await?;
                return Ok(());
            };
            let item = match state
                .store
                .with_service(move |service| service.item_for_broadcast(actor, id))
                .await?
            {
                Ok(item) => item,
                Err(ItemServiceError::NotFound(_)) => {
                    bot.edit_message_text(chat_id, message_id, "Item not found.")
                        .await?;
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            bot.send_message(target, render::item_caption(&item))
                .parse_mode(ParseMode::Html)
                .await?;
            info!(
                "event=broadcast module=bot status=ok item_id={id} actor={} source=callback",
                actor.user_id
            );
            bot.edit_message_text(chat_id, message_id, "Broadcasted.")
                .await?;
        }
    }

    Ok(())
}
