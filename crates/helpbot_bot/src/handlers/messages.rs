//! Pasted text and uploaded files.

use crate::errors::HandlerResult;
use crate::render;
use crate::state::BotState;
use helpbot_core::{FileRef, FileUpload, ItemServiceError, SaveOutcome};
use log::debug;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

const PHOTO_FILE_NAME: &str = "photo.jpg";
const PHOTO_MIME_TYPE: &str = "image/jpeg";

pub async fn on_text(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let Some(text) = msg.text().map(str::to_string) else {
        return Ok(());
    };
    save_text(&bot, &msg, &state, text).await
}

/// Saves links (or an admin note) from `text` and replies with the new ids.
pub(crate) async fn save_text(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    text: String,
) -> HandlerResult {
    let actor = state.actor(msg.from.as_ref());
    debug!(
        "event=text_received module=bot status=start actor={} text_len={}",
        actor.user_id,
        text.chars().count()
    );

    let outcome = state
        .store
        .with_service(move |service| service.save_text(actor, &text))
        .await??;

    let ids = match outcome {
        SaveOutcome::Saved(ids) => ids,
        SaveOutcome::LinkRequired => {
            bot.send_message(
                msg.chat.id,
                "Please include a link, or ask an admin to save notes.",
            )
            .await?;
            return Ok(());
        }
    };

    let mut request = bot
        .send_message(msg.chat.id, render::saved_reply(&ids))
        .parse_mode(ParseMode::Html);
    if actor.is_admin && state.target_chat.is_some() {
        if let Some(last) = ids.last() {
            request = request.reply_markup(render::broadcast_keyboard(*last));
        }
    }
    request.await?;
    Ok(())
}

pub async fn on_file(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let Some(file) = uploaded_file(&msg) else {
        return Ok(());
    };
    let actor = state.actor(msg.from.as_ref());
    if !actor.is_admin {
        bot.send_message(msg.chat.id, "Only admins can store files.")
            .await?;
        return Ok(());
    }

    let upload = FileUpload {
        file,
        caption: msg.caption().map(str::to_string),
    };
    let saved = state
        .store
        .with_service(move |service| service.save_file(actor, upload))
        .await?;
    let id = match saved {
        Ok(id) => id,
        Err(ItemServiceError::Forbidden(_)) => {
            bot.send_message(msg.chat.id, "Only admins can store files.")
                .await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    bot.send_message(msg.chat.id, format!("Stored file as item <code>{id}</code>."))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Documents keep their own name and type; photos use the largest size.
fn uploaded_file(msg: &Message) -> Option<FileRef> {
    if let Some(document) = msg.document() {
        return Some(FileRef {
            file_id: document.file.id.to_string(),
            file_name: document.file_name.clone(),
            mime_type: document.mime_type.as_ref().map(|mime| mime.to_string()),
        });
    }

    let largest = msg.photo()?.last()?;
    Some(FileRef {
        file_id: largest.file.id.to_string(),
        file_name: Some(PHOTO_FILE_NAME.to_string()),
        mime_type: Some(PHOTO_MIME_TYPE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::uploaded_file;
    use crate::handlers::test_support::{msg, private_base};

    #[test]
    fn photos_use_the_largest_size_and_a_fixed_name() {
        let mut json = private_base(3);
        json["photo"] = serde_json::json!([
            {"file_id": "small", "file_unique_id": "us", "width": 90, "height": 60, "file_size": 900},
            {"file_id": "large", "file_unique_id": "ul", "width": 1280, "height": 853, "file_size": 90000}
        ]);

        let file = uploaded_file(&msg(json)).unwrap();
        assert_eq!(file.file_id, "large");
        assert_eq!(file.file_name.as_deref(), Some("photo.jpg"));
        assert_eq!(file.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn documents_keep_their_name_and_type() {
        let mut json = private_base(3);
        json["document"] = serde_json::json!({
            "file_id": "doc1", "file_unique_id": "udoc1",
            "file_size": 512, "file_name": "travel-policy.pdf",
            "mime_type": "application/pdf"
        });

        let file = uploaded_file(&msg(json)).unwrap();
        assert_eq!(file.file_id, "doc1");
        assert_eq!(file.file_name.as_deref(), Some("travel-policy.pdf"));
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn text_messages_carry_no_file() {
        let mut json = private_base(3);
        json["text"] = serde_json::json!("hello");

        assert!(uploaded_file(&msg(json)).is_none());
    }
}
