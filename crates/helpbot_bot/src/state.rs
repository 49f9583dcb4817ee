use crate::store::Store;
use helpbot_core::{Actor, AdminSet};
use std::sync::Arc;
use teloxide::types::{ChatId, User};

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct BotState {
    pub store: Store,
    pub admins: Arc<AdminSet>,
    pub target_chat: Option<ChatId>,
}

impl BotState {
    pub fn new(store: Store, admins: AdminSet, target_chat: Option<ChatId>) -> Self {
        Self {
            store,
            admins: Arc::new(admins),
            target_chat,
        }
    }

    /// Updates without a sender (channel posts) act as user 0, never admin.
    pub fn actor(&self, user: Option<&User>) -> Actor {
        let user_id = user.map_or(0, |user| user.id.0);
        Actor {
            user_id,
            is_admin: user_id != 0 && self.admins.is_admin(user_id),
        }
    }
}
