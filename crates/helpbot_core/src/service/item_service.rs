//! Item use-case service.
//!
//! # Responsibility
//! - Turn pasted text and uploaded files into stored items.
//! - Apply the admin policy: notes, files, deletion and export are
//!   admin-only, links may be saved by anyone.
//! - Provide browse-by-tag and recent-item listings.
//!
//! # Invariants
//! - One stored link item per URL found in a message; all share the
//!   message's tags and note text.
//! - Permission checks happen before any write.

use crate::capture::{extract_hashtags, normalize_tag, prettify_url, Submission};
use crate::model::item::{FileRef, Item, ItemId, NewItem};
use crate::repo::item_repo::{
    normalize_limit, ItemListQuery, ItemRepository, RepoError, RepoResult, TagCount,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_NOTE_TITLE: &str = "Note";
const DEFAULT_FILE_TITLE: &str = "File";

/// Who is acting, as far as the service is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: u64,
    pub is_admin: bool,
}

/// Operations reserved for admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    SaveFile,
    Delete,
    Export,
    Broadcast,
}

impl Display for AdminAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SaveFile => "save_file",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Broadcast => "broadcast",
        };
        f.write_str(name)
    }
}

/// Service error for item use-cases.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Actor is not an admin.
    Forbidden(AdminAction),
    /// Tag input is blank after normalization.
    InvalidTag(String),
    NotFound(ItemId),
    Repo(RepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden(action) => write!(f, "admin privileges required for {action}"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Outcome of saving one text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Vec<ItemId>),
    /// No link in the text and the actor may not save notes.
    LinkRequired,
}

/// Uploaded document or photo with its optional caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file: FileRef,
    pub caption: Option<String>,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

impl ItemsPage {
    /// Offset of the following page, when this one was full.
    pub fn next_offset(&self, offset: u32) -> Option<u32> {
        let returned = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        (returned > 0 && returned >= self.applied_limit).then(|| offset + returned)
    }
}

/// Item service facade over repository implementations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the links (or, for admins, the note) contained in `text`.
    pub fn save_text(&mut self, actor: Actor, text: &str) -> Result<SaveOutcome, ItemServiceError> {
        let submission = Submission::parse(text);
        let added_by = i64::try_from(actor.user_id).ok();

        if submission.urls.is_empty() {
            if !actor.is_admin {
                return Ok(SaveOutcome::LinkRequired);
            }
            let title = non_empty_or(&submission.note, DEFAULT_NOTE_TITLE);
            let mut item = NewItem::note(title).with_tags(submission.tags);
            item.added_by = added_by;
            let id = self.create(&item)?;
            return Ok(SaveOutcome::Saved(vec![id]));
        }

        let mut ids = Vec::with_capacity(submission.urls.len());
        for url in &submission.urls {
            let title = if submission.note.is_empty() {
                prettify_url(url)
            } else {
                submission.note.clone()
            };
            let mut item = NewItem::link(url.as_str(), title).with_tags(submission.tags.clone());
            item.added_by = added_by;
            ids.push(self.create(&item)?);
        }
        Ok(SaveOutcome::Saved(ids))
    }

    /// Stores an uploaded file. Admin only.
    pub fn save_file(
        &mut self,
        actor: Actor,
        upload: FileUpload,
    ) -> Result<ItemId, ItemServiceError> {
        require_admin(actor, AdminAction::SaveFile)?;

        let caption = upload.caption.unwrap_or_default();
        let caption_title = caption
            .split_whitespace()
            .filter(|word| !word.starts_with('#'))
            .collect::<Vec<_>>()
            .join(" ");
        let title = if !caption_title.is_empty() {
            caption_title
        } else {
            upload
                .file
                .file_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_TITLE.to_string())
        };

        let mut item = NewItem::file(upload.file, title).with_tags(extract_hashtags(&caption));
        item.added_by = i64::try_from(actor.user_id).ok();
        self.create(&item)
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    /// Looks up an item for re-posting to the target chat. Admin only.
    pub fn item_for_broadcast(&self, actor: Actor, id: ItemId) -> Result<Item, ItemServiceError> {
        require_admin(actor, AdminAction::Broadcast)?;
        self.repo
            .get_item(id)?
            .ok_or(ItemServiceError::NotFound(id))
    }

    /// Deletes one item. Admin only. Returns `false` when the id is unknown.
    pub fn delete_item(&self, actor: Actor, id: ItemId) -> Result<bool, ItemServiceError> {
        require_admin(actor, AdminAction::Delete)?;
        let deleted = self.repo.delete_item(id)?;
        if deleted {
            info!(
                "event=item_deleted module=service status=ok item_id={id} actor={}",
                actor.user_id
            );
        }
        Ok(deleted)
    }

    pub fn recent(
        &self,
        files_only: bool,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<ItemsPage, ItemServiceError> {
        let applied_limit = normalize_limit(limit);
        let items = self.repo.list_recent(&ItemListQuery {
            files_only,
            limit: Some(applied_limit),
            offset,
        })?;
        Ok(ItemsPage {
            items,
            applied_limit,
        })
    }

    /// Lists items with exactly this tag. Accepts `#tag` or `tag`.
    pub fn by_tag(
        &self,
        tag: &str,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<ItemsPage, ItemServiceError> {
        let normalized =
            normalize_tag(tag).ok_or_else(|| ItemServiceError::InvalidTag(tag.to_string()))?;
        let applied_limit = normalize_limit(limit);
        let items = self
            .repo
            .list_by_tag(&normalized, Some(applied_limit), offset)?;
        Ok(ItemsPage {
            items,
            applied_limit,
        })
    }

    pub fn list_tags(&self) -> RepoResult<Vec<TagCount>> {
        self.repo.list_tags()
    }

    /// Every stored item, oldest first. Admin only.
    pub fn export_items(&self, actor: Actor) -> Result<Vec<Item>, ItemServiceError> {
        require_admin(actor, AdminAction::Export)?;
        Ok(self.repo.list_all()?)
    }

    fn create(&mut self, item: &NewItem) -> Result<ItemId, ItemServiceError> {
        let id = self.repo.create_item(item)?;
        info!(
            "event=item_saved module=service status=ok item_id={id} kind={:?} tags={}",
            item.kind(),
            item.tags.len()
        );
        Ok(id)
    }
}

fn require_admin(actor: Actor, action: AdminAction) -> Result<(), ItemServiceError> {
    if actor.is_admin {
        return Ok(());
    }
    warn!(
        "event=access_denied module=service status=rejected action={action} actor={}",
        actor.user_id
    );
    Err(ItemServiceError::Forbidden(action))
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
