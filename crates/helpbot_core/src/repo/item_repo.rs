//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/delete/list APIs over the `items` table.
//! - Own the tag index (`tags`, `item_tags`) and keep it in step with the
//!   denormalized `items.tags` column that full-text search reads.
//!
//! # Invariants
//! - Write paths call `NewItem::validate()` before SQL mutations.
//! - An item row and its tag links are written in one transaction.
//! - List results are newest first (`id DESC`) unless documented otherwise.

use crate::capture::{format_tags, normalize_tag, parse_tag_list};
use crate::db::DbError;
use crate::model::item::{FileRef, Item, ItemId, ItemValidationError, NewItem};
use chrono::{SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEMS_DEFAULT_LIMIT: u32 = 25;
const ITEMS_LIMIT_MAX: u32 = 50;

/// Column list shared by every item read path. Prefixed so it can be used
/// in joins against `items_fts`.
pub(crate) const ITEM_COLUMNS_SQL: &str = "items.id AS id,
    items.url AS url,
    items.title AS title,
    items.description AS description,
    items.tags AS tags,
    items.added_by AS added_by,
    items.added_at AS added_at,
    items.file_id AS file_id,
    items.file_name AS file_name,
    items.file_type AS file_type";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for recent-item listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Only items that reference an uploaded file.
    pub files_only: bool,
    /// Maximum rows to return. Defaults to 25 and clamps to 50.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Tag name with the number of items carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub name: String,
    pub items: u32,
}

/// Repository interface for item and tag operations.
pub trait ItemRepository {
    /// Inserts one item with its tag links and returns the new id.
    fn create_item(&mut self, item: &NewItem) -> RepoResult<ItemId>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Removes one item. Returns `false` when no row matched.
    fn delete_item(&self, id: ItemId) -> RepoResult<bool>;
    fn list_recent(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    /// Lists items carrying exactly `tag` (normalized before matching).
    fn list_by_tag(&self, tag: &str, limit: Option<u32>, offset: u32) -> RepoResult<Vec<Item>>;
    /// Tags attached to at least one item, most used first.
    fn list_tags(&self) -> RepoResult<Vec<TagCount>>;
    /// Every item in insertion order, for export.
    fn list_all(&self) -> RepoResult<Vec<Item>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&mut self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        let added_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let file = item.file.as_ref();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO items (
                url,
                title,
                description,
                tags,
                added_by,
                added_at,
                file_id,
                file_name,
                file_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                item.url.as_deref(),
                item.title.as_str(),
                item.description.as_str(),
                format_tags(&item.tags),
                item.added_by,
                added_at,
                file.map(|f| f.file_id.as_str()),
                file.and_then(|f| f.file_name.as_deref()),
                file.and_then(|f| f.mime_type.as_deref()),
            ],
        )?;
        let id = tx.last_insert_rowid();

        link_tags_in_tx(&tx, id, &item.tags)?;
        tx.commit()?;

        Ok(id)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS_SQL} FROM items WHERE items.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM items WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn list_recent(&self, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("SELECT {ITEM_COLUMNS_SQL} FROM items WHERE 1 = 1");
        if query.files_only {
            sql.push_str(" AND items.file_id IS NOT NULL");
        }
        sql.push_str(" ORDER BY items.id DESC LIMIT ? OFFSET ?");

        let bind_values = vec![
            Value::Integer(i64::from(normalize_limit(query.limit))),
            Value::Integer(i64::from(query.offset)),
        ];
        query_items(self.conn, &sql, bind_values)
    }

    fn list_by_tag(&self, tag: &str, limit: Option<u32>, offset: u32) -> RepoResult<Vec<Item>> {
        let Some(tag) = normalize_tag(tag) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {ITEM_COLUMNS_SQL}
             FROM items
             WHERE EXISTS (
                SELECT 1
                FROM item_tags it
                INNER JOIN tags t ON t.id = it.tag_id
                WHERE it.item_id = items.id
                  AND t.name = ? COLLATE NOCASE
             )
             ORDER BY items.id DESC
             LIMIT ? OFFSET ?"
        );
        let bind_values = vec![
            Value::Text(tag),
            Value::Integer(i64::from(normalize_limit(limit))),
            Value::Integer(i64::from(offset)),
        ];
        query_items(self.conn, &sql, bind_values)
    }

    fn list_tags(&self) -> RepoResult<Vec<TagCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name AS name, COUNT(it.item_id) AS items
             FROM tags t
             INNER JOIN item_tags it ON it.tag_id = t.id
             GROUP BY t.id
             ORDER BY items DESC, t.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get("name")?;
            tags.push(TagCount {
                name: name.to_lowercase(),
                items: row.get("items")?,
            });
        }
        Ok(tags)
    }

    fn list_all(&self) -> RepoResult<Vec<Item>> {
        query_items(
            self.conn,
            &format!("SELECT {ITEM_COLUMNS_SQL} FROM items ORDER BY items.id ASC"),
            Vec::new(),
        )
    }
}

/// Normalizes list limit according to the listing contract.
pub fn normalize_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => ITEMS_DEFAULT_LIMIT,
        Some(value) if value > ITEMS_LIMIT_MAX => ITEMS_LIMIT_MAX,
        Some(value) => value,
    }
}

fn query_items(conn: &Connection, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Item>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_item_row(row)?);
    }
    Ok(items)
}

/// Links `item_id` to each normalized tag, creating missing tag rows.
///
/// Callers run this inside their own transaction.
pub(crate) fn link_tags_in_tx(
    conn: &Connection,
    item_id: ItemId,
    tags: &[String],
) -> rusqlite::Result<()> {
    for tag in tags {
        conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO item_tags (item_id, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![item_id, tag.as_str()],
        )?;
    }
    Ok(())
}

/// Decodes one row selected with [`ITEM_COLUMNS_SQL`].
///
/// Legacy rows may carry NULL text columns; those read as empty strings.
pub(crate) fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    let file = match row.get::<_, Option<String>>("file_id")? {
        Some(file_id) if !file_id.is_empty() => Some(FileRef {
            file_id,
            file_name: row.get("file_name")?,
            mime_type: row.get("file_type")?,
        }),
        Some(_) => {
            return Err(RepoError::InvalidData(format!(
                "empty file_id in items.file_id for item {id}"
            )));
        }
        None => None,
    };

    Ok(Item {
        id,
        url: row.get("url")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        tags: parse_tag_list(&row.get::<_, Option<String>>("tags")?.unwrap_or_default()),
        added_by: row.get("added_by")?,
        added_at: row.get::<_, Option<String>>("added_at")?.unwrap_or_default(),
        file,
    })
}
