//! SQLite FTS5-based item search.
//!
//! # Responsibility
//! - Provide keyword search over title, url, description, tags and file name.
//! - Return full items so callers can render pickers without a second query.
//!
//! # Invariants
//! - Every plain term is matched as a prefix, so type-as-you-search works.
//! - Result ordering is deterministic: `bm25` rank, then newest first.

use crate::db::DbError;
use crate::model::item::Item;
use crate::repo::item_repo::{parse_item_row, RepoError, ITEM_COLUMNS_SQL};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing, DB interaction and result decoding.
#[derive(Debug)]
pub enum SearchError {
    /// Raw FTS5 expression could not be parsed.
    InvalidQuery {
        query: String,
        message: String,
    },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidQuery { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Search options.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    /// Restrict to items that reference an uploaded file.
    pub files_only: bool,
    pub limit: u32,
    pub offset: u32,
    /// Pass `text` through as a raw FTS5 expression.
    ///
    /// Default is `false` so picker typing never hits syntax errors.
    pub raw_fts_syntax: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            files_only: false,
            limit: 25,
            offset: 0,
            raw_fts_syntax: false,
        }
    }

    pub fn files_only(mut self, files_only: bool) -> Self {
        self.files_only = files_only;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Searches items via FTS5 and returns ranked results.
///
/// Returns an empty list for blank queries and `limit == 0`. Terms without
/// any alphanumeric character are dropped, so punctuation-only text
/// (`files: !!!` in the picker) also yields nothing. The FTS tokenizer
/// splits on punctuation, so `c++` searches as the prefix `c*`.
pub fn search_items(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<Item>> {
    let Some(match_expr) = build_match_expression(query) else {
        return Ok(Vec::new());
    };

    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        "SELECT {ITEM_COLUMNS_SQL}
         FROM items_fts
         JOIN items ON items.id = items_fts.rowid
         WHERE items_fts MATCH ?"
    );
    let mut bind_values: Vec<Value> = vec![Value::Text(match_expr.clone())];

    if query.files_only {
        sql.push_str(" AND items.file_id IS NOT NULL");
    }

    sql.push_str(" ORDER BY bm25(items_fts), items.id DESC LIMIT ? OFFSET ?");
    bind_values.push(Value::Integer(i64::from(query.limit)));
    bind_values.push(Value::Integer(i64::from(query.offset)));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(bind_values))
        .map_err(|err| map_query_error(err, &match_expr))?;
    let mut items = Vec::new();

    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_expr))?
    {
        items.push(parse_item_row(row)?);
    }

    Ok(items)
}

fn build_match_expression(query: &SearchQuery) -> Option<String> {
    let text = query.text.trim();
    if text.is_empty() {
        return None;
    }

    if query.raw_fts_syntax {
        return Some(text.to_string());
    }

    let terms = text
        .split_whitespace()
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(prefix_term)
        .collect::<Vec<_>>();

    if terms.is_empty() {
        return None;
    }

    Some(terms.join(" AND "))
}

fn prefix_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"*")
}

fn map_query_error(err: rusqlite::Error, query: &str) -> SearchError {
    if is_match_syntax_error(&err) {
        return SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }

    SearchError::Db(DbError::Sqlite(err))
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_match_expression, SearchQuery};

    #[test]
    fn terms_become_quoted_prefix_phrases() {
        let expr = build_match_expression(&SearchQuery::new("rust \"book")).unwrap();
        assert_eq!(expr, "\"rust\"* AND \"\"\"book\"*");
    }

    #[test]
    fn punctuation_only_terms_are_dropped() {
        assert_eq!(build_match_expression(&SearchQuery::new("# - ...")), None);
        let expr = build_match_expression(&SearchQuery::new("#ai !")).unwrap();
        assert_eq!(expr, "\"#ai\"*");
    }
}
