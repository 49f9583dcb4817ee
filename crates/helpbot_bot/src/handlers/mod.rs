//! Update routing.
//!
//! Commands are matched first; other messages are split into uploads and
//! plain text. Text starting with `/` that is not a known command is
//! ignored rather than saved.

pub mod callbacks;
pub mod commands;
pub mod inline;
pub mod messages;

use crate::commands::Command;
use crate::errors::HandlerError;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

pub fn schema() -> UpdateHandler<HandlerError> {
    let message_handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(commands::answer),
        )
        .branch(
            dptree::filter(|msg: Message| is_upload(&msg)).endpoint(messages::on_file),
        )
        .branch(
            dptree::filter(|msg: Message| is_plain_text(&msg)).endpoint(messages::on_text),
        );

    let callback_handler = Update::filter_callback_query().endpoint(callbacks::on_callback);

    let inline_query_handler = Update::filter_inline_query().endpoint(inline::on_inline_query);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
        .branch(inline_query_handler)
}

fn is_upload(msg: &Message) -> bool {
    msg.document().is_some() || msg.photo().is_some()
}

/// Text that should be saved. Unknown `/commands` fall through to here and
/// are rejected.
fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|text| !text.starts_with('/'))
}


#[cfg(test)]
mod tests {
    use super::test_support::{msg, private_base};
    use super::{is_plain_text, is_upload};

    #[test]
    fn pasted_links_are_plain_text() {
        let mut json = private_base(7);
        json["text"] = serde_json::json!("https://example.com #docs");
        let message = msg(json);

        assert!(is_plain_text(&message));
        assert!(!is_upload(&message));
    }

    #[test]
    fn unknown_commands_are_not_saved() {
        let mut json = private_base(7);
        json["text"] = serde_json::json!("/unknown https://example.com");

        assert!(!is_plain_text(&msg(json)));
    }

    #[test]
    fn captioned_photos_route_as_uploads_only() {
        let mut json = private_base(7);
        json["photo"] = serde_json::json!([
            {"file_id": "ph1", "file_unique_id": "uph1", "width": 90, "height": 60, "file_size": 900}
        ]);
        json["caption"] = serde_json::json!("whiteboard #ops");
        let message = msg(json);

        assert!(is_upload(&message));
        assert!(!is_plain_text(&message));
    }
}
