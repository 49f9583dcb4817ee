//! Inline picker: `@bot query` from any chat.

use crate::errors::{HandlerError, HandlerResult};
use crate::render;
use crate::state::BotState;
use helpbot_core::{
    parse_page_offset, search_items, Item, ItemService, PickerQuery, SearchQuery,
    SqliteItemRepository,
};
use log::info;
use teloxide::prelude::*;
use teloxide::types::InlineQueryResult;

const PICKER_PAGE_SIZE: u32 = 25;
const MAX_INLINE_RESULTS: usize = 50;

pub async fn on_inline_query(bot: Bot, q: InlineQuery, state: BotState) -> HandlerResult {
    let picker = PickerQuery::parse(&q.query);
    let offset = parse_page_offset(&q.offset);
    let (query_len, files_only) = (picker.text.chars().count(), picker.files_only);

    let items = state
        .store
        .run(move |conn| load_page(conn, &picker, offset))
        .await??;

    let next_offset = (items.len() >= PICKER_PAGE_SIZE as usize)
        .then(|| (offset + PICKER_PAGE_SIZE).to_string());
    let results: Vec<InlineQueryResult> = items
        .iter()
        .take(MAX_INLINE_RESULTS)
        .map(render::inline_result)
        .collect();
    info!(
        "event=inline_query module=bot status=ok query_len={query_len} files_only={files_only} offset={offset} results={}",
        results.len()
    );

    let mut req = bot.answer_inline_query(&q.id, results);
    req.cache_time = Some(0);
    req.is_personal = Some(true);
    req.next_offset = next_offset;
    req.await?;
    Ok(())
}

/// Blank queries list recent items; anything else is a full-text search.
fn load_page(
    conn: &mut rusqlite::Connection,
    picker: &PickerQuery,
    offset: u32,
) -> Result<Vec<Item>, HandlerError> {
    if picker.is_blank() {
        let service = ItemService::new(SqliteItemRepository::new(conn));
        let page = service.recent(picker.files_only, Some(PICKER_PAGE_SIZE), offset)?;
        return Ok(page.items);
    }

    let query = SearchQuery::new(picker.text.as_str())
        .files_only(picker.files_only)
        .limit(PICKER_PAGE_SIZE)
        .offset(offset);
    Ok(search_items(conn, &query)?)
}
