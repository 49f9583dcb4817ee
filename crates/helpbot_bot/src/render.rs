//! HTML captions, keyboards and inline results for stored items.

use crate::callback::CallbackAction;
use helpbot_core::model::item::truncate_chars;
use helpbot_core::{format_tags, prettify_url, Item, ItemId, TagCount};
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InlineQueryResultCachedDocument, InlineQueryResultCachedPhoto, InputMessageContent,
    InputMessageContentText, ParseMode,
};
use teloxide::utils::html::escape;

const CAPTION_DESCRIPTION_CHARS: usize = 200;
const BUTTON_LABEL_CHARS: usize = 60;
const RESULT_DESCRIPTION_CHARS: usize = 120;
const TAG_LIST_MAX: usize = 50;

pub fn item_caption(item: &Item) -> String {
    let mut parts = Vec::new();
    if !item.title.is_empty() {
        parts.push(format!("<b>{}</b>", escape(&item.title)));
    }
    if let Some(url) = non_empty(item.url.as_deref()) {
        parts.push(escape(&prettify_url(url)));
    }
    if !item.description.is_empty() {
        let head = truncate_chars(&item.description, CAPTION_DESCRIPTION_CHARS);
        parts.push(format!("{}…", escape(&head)));
    }
    if !item.tags.is_empty() {
        parts.push(format!("<i>{}</i>", escape(&format_tags(&item.tags))));
    }
    parts.push(format!("ID: <code>{}</code>", item.id));
    parts.join("\n")
}

pub fn button_label(item: &Item) -> String {
    let label = if !item.title.is_empty() {
        item.title.clone()
    } else if let Some(url) = non_empty(item.url.as_deref()) {
        prettify_url(url)
    } else {
        format!("file #{}", item.id)
    };
    truncate_chars(&label, BUTTON_LABEL_CHARS)
}

/// One `open:<id>` button per item, or `None` for an empty list.
pub fn results_keyboard(items: &[Item]) -> Option<InlineKeyboardMarkup> {
    if items.is_empty() {
        return None;
    }
    let rows = items
        .iter()
        .map(|item| {
            vec![InlineKeyboardButton::callback(
                button_label(item),
                CallbackAction::Open(item.id).encode(),
            )]
        })
        .collect::<Vec<_>>();
    Some(InlineKeyboardMarkup::new(rows))
}

pub fn picker_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::switch_inline_query_current_chat(
            "Open picker here",
            "",
        )],
        vec![InlineKeyboardButton::switch_inline_query(
            "Open picker (any chat)",
            "",
        )],
    ])
}

pub fn broadcast_keyboard(id: ItemId) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Broadcast latest",
        CallbackAction::Broadcast(id).encode(),
    )]])
}

pub fn saved_reply(ids: &[ItemId]) -> String {
    match ids {
        [id] => format!("Saved. ID: <code>{id}</code>"),
        _ => format!(
            "Saved {} items. IDs: <code>{}</code>",
            ids.len(),
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub fn tags_reply(tags: &[TagCount]) -> String {
    if tags.is_empty() {
        return "No tags yet.".to_string();
    }
    let lines = tags
        .iter()
        .take(TAG_LIST_MAX)
        .map(|tag| format!("#{} ({})", escape(&tag.name), tag.items))
        .collect::<Vec<_>>();
    format!("<b>Tags</b>\n{}", lines.join("\n"))
}

/// Header above `/tag` results (HTML).
pub fn tag_header(tag: &str) -> String {
    format!("<b>{}</b>:", escape(&format!("#{tag}")))
}

/// Plain-text reply when `/tag` matched nothing.
pub fn no_tag_items_reply(tag: &str) -> String {
    format!("No items found for #{tag}.")
}

pub fn welcome_text(username: &str) -> String {
    format!(
        "Hi! I collect and organize your team's links and materials.\n\n\
         <b>Quick use</b>\n\
         • Paste a link and I'll save it (use #tags anywhere).\n\
         • Send files (PDF, PPT, DOCX) and I'll index them too.\n\n\
         <b>Search &amp; share from any chat</b>\n\
         • Type <code>@{username} query</code> in ANY chat to open the picker.\n\
         • Tip: type nothing after @ to see recent items.\n\n\
         Or tap a button below ⬇️",
        username = escape(username)
    )
}

pub fn help_text(username: &str) -> String {
    format!(
        "<b>Commands</b>\n\
         /picker - open the inline picker in this chat\n\
         /add &lt;url&gt; [text + #tags] - save a link\n\
         /search &lt;query&gt; - search saved items\n\
         /tag &lt;tag&gt; - browse by tag\n\
         /tags - list tags in use\n\
         /export - (admin) export CSV\n\
         /delete &lt;id&gt; - (admin) remove an item\n\
         /broadcast &lt;id&gt; - (admin) repost an item to target chat\n\
         \n\
         <i>Inline tips:</i> type <code>@{username}</code> in any chat to open the picker; \
         use <code>files:</code> to filter to files only, e.g. <code>files: policy</code>.",
        username = escape(username)
    )
}

/// Picker entry for one item. Files are re-shared from Telegram storage;
/// links and notes are sent as their caption.
pub fn inline_result(item: &Item) -> InlineQueryResult {
    let caption = item_caption(item);

    if let Some(file) = &item.file {
        if file.is_image() {
            let mut result =
                InlineQueryResultCachedPhoto::new(format!("photo-{}", item.id), file.file_id.clone());
            result.caption = Some(caption);
            result.parse_mode = Some(ParseMode::Html);
            return InlineQueryResult::CachedPhoto(result);
        }

        let title = first_non_empty(&[Some(item.title.as_str()), file.file_name.as_deref()])
            .map(str::to_string)
            .unwrap_or_else(|| format!("File #{}", item.id));
        let mut result = InlineQueryResultCachedDocument::new(
            format!("doc-{}", item.id),
            title,
            file.file_id.clone(),
        );
        result.caption = Some(caption);
        result.parse_mode = Some(ParseMode::Html);
        return InlineQueryResult::CachedDocument(result);
    }

    let tags = format_tags(&item.tags);
    let mut content = InputMessageContentText::new(caption);
    content.parse_mode = Some(ParseMode::Html);
    let content = InputMessageContent::Text(content);

    let mut result = match non_empty(item.url.as_deref()) {
        Some(url) => {
            let title = non_empty(Some(item.title.as_str())).unwrap_or(url);
            let mut article =
                InlineQueryResultArticle::new(format!("url-{}", item.id), title, content);
            let description = if tags.is_empty() { url } else { tags.as_str() };
            article.description = Some(truncate_chars(description, RESULT_DESCRIPTION_CHARS));
            article
        }
        None => {
            let title = non_empty(Some(item.title.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Item #{}", item.id));
            let mut article =
                InlineQueryResultArticle::new(format!("note-{}", item.id), title, content);
            article.description = Some(truncate_chars(&tags, RESULT_DESCRIPTION_CHARS));
            article
        }
    };
    if result.description.as_deref() == Some("") {
        result.description = None;
    }
    InlineQueryResult::Article(result)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find_map(non_empty)
}
