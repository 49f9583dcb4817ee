//! Core domain logic for the helpbot link and file library.
//! This crate is the single source of truth for storage, search and
//! permission rules; the bot and admin CLI only translate I/O.

pub mod access;
pub mod capture;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use access::AdminSet;
pub use capture::{extract_hashtags, extract_urls, format_tags, prettify_url, Submission};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::{items_csv_bytes, write_items_csv, ExportError, EXPORT_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{FileRef, Item, ItemId, ItemKind, ItemValidationError, NewItem};
pub use repo::item_repo::{
    ItemListQuery, ItemRepository, RepoError, RepoResult, SqliteItemRepository, TagCount,
};
pub use search::fts::{search_items, SearchError, SearchQuery, SearchResult};
pub use search::picker::{parse_page_offset, PickerQuery};
pub use service::item_service::{
    Actor, AdminAction, FileUpload, ItemService, ItemServiceError, ItemsPage, SaveOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
