//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical record for saved links, files and notes.
//! - Enforce length caps and shape rules before persistence.
//!
//! # Invariants
//! - `id` is the SQLite rowid and is never reused while the row exists.
//! - An item with a `file` is a file item regardless of `url`.
//! - `title` never exceeds 500 chars, `description` never exceeds 2000 chars.
//! - `tags` are normalized (lowercase, no `#`), deduplicated and sorted.

use crate::capture::normalize_tag;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Numeric identifier users see in replies and type in `/delete <id>`.
pub type ItemId = i64;

pub const TITLE_MAX_CHARS: usize = 500;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Projection of an item, derived from which fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Uploaded document or photo, referenced by Telegram file id.
    File,
    /// Saved web link.
    Link,
    /// Free text saved by an admin.
    Note,
}

/// Reference to a file already stored on Telegram servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl FileRef {
    /// Images are re-shared as photos, everything else as documents.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.to_ascii_lowercase().starts_with("image/"))
    }
}

/// Persisted item as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub url: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Telegram user id of the submitter, when known.
    pub added_by: Option<i64>,
    /// RFC 3339 UTC timestamp.
    pub added_at: String,
    pub file: Option<FileRef>,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        derive_kind(self.url.as_deref(), self.file.as_ref())
    }
}

/// Write model for new items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub url: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub added_by: Option<i64>,
    pub file: Option<FileRef>,
}

impl NewItem {
    /// Creates a link item. `url` is expected to carry an http(s) scheme.
    pub fn link(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::note(title)
        }
    }

    /// Creates a text-only note item.
    pub fn note(title: impl Into<String>) -> Self {
        Self {
            url: None,
            title: truncate_chars(&title.into(), TITLE_MAX_CHARS),
            description: String::new(),
            tags: Vec::new(),
            added_by: None,
            file: None,
        }
    }

    /// Creates a file item.
    pub fn file(file: FileRef, title: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            ..Self::note(title)
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = truncate_chars(&description.into(), DESCRIPTION_MAX_CHARS);
        self
    }

    pub fn added_by(mut self, user_id: i64) -> Self {
        self.added_by = Some(user_id);
        self
    }

    pub fn kind(&self) -> ItemKind {
        derive_kind(self.url.as_deref(), self.file.as_ref())
    }

    /// Validates shape rules that storage relies on.
    ///
    /// # Errors
    /// - `EmptyFileId` when a file reference has a blank id.
    /// - `InvalidUrl` when a link does not use an http(s) scheme.
    /// - `InvalidTag` when a tag is not in normalized form.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if let Some(file) = &self.file {
            if file.file_id.trim().is_empty() {
                return Err(ItemValidationError::EmptyFileId);
            }
        }

        if let Some(url) = &self.url {
            let lower = url.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(ItemValidationError::InvalidUrl(url.clone()));
            }
        }

        for tag in &self.tags {
            if normalize_tag(tag).as_deref() != Some(tag.as_str()) {
                return Err(ItemValidationError::InvalidTag(tag.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyFileId,
    InvalidUrl(String),
    InvalidTag(String),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFileId => write!(f, "file item requires a non-empty file id"),
            Self::InvalidUrl(url) => write!(f, "link must use http or https: `{url}`"),
            Self::InvalidTag(tag) => write!(f, "tag is not normalized: `{tag}`"),
        }
    }
}

impl Error for ItemValidationError {}

fn derive_kind(url: Option<&str>, file: Option<&FileRef>) -> ItemKind {
    if file.is_some() {
        ItemKind::File
    } else if url.is_some() {
        ItemKind::Link
    } else {
        ItemKind::Note
    }
}

/// Keeps the first `max_chars` characters of `value`.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
