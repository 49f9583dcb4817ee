//! Shared SQLite handle for async handlers.
//!
//! The connection lives behind a `Mutex`; every access runs on tokio's
//! blocking pool so a slow query never stalls the dispatcher.

use helpbot_core::{ItemService, SqliteItemRepository};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum StoreError {
    Poisoned,
    Join(tokio::task::JoinError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poisoned => write!(f, "database mutex poisoned"),
            Self::Join(err) => write!(f, "database task failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Poisoned => None,
            Self::Join(err) => Some(err),
        }
    }
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> T + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            Ok(f(&mut *guard))
        })
        .await
        .map_err(StoreError::Join)?
    }

    /// Runs `f` against an [`ItemService`] bound to the shared connection.
    pub async fn with_service<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut ItemService<SqliteItemRepository<'_>>) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.run(move |conn| {
            let mut service = ItemService::new(SqliteItemRepository::new(conn));
            f(&mut service)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use helpbot_core::{open_db_in_memory, Actor, SaveOutcome};

    #[tokio::test]
    async fn service_calls_share_one_connection() {
        let store = Store::new(open_db_in_memory().unwrap());
        let actor = Actor {
            user_id: 9,
            is_admin: false,
        };

        let outcome = store
            .with_service(move |service| service.save_text(actor, "https://a.example #x"))
            .await
            .unwrap()
            .unwrap();
        let SaveOutcome::Saved(ids) = outcome else {
            panic!("link should be saved");
        };

        let item = store
            .with_service(move |service| service.get_item(ids[0]))
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(item.tags, vec!["x"]);
    }
}
