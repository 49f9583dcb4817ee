//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every migration is safe to run over a legacy `items` table.
//! - Tag names written by a backfill go through `parse_tag_list`, the same
//!   normalizer item reads use.

use crate::capture::{format_tags, parse_tag_list};
use crate::db::{DbError, DbResult};
use crate::model::item::ItemId;
use crate::repo::item_repo::link_tags_in_tx;
use log::info;
use rusqlite::{params, Connection};

/// Data step run after a migration's SQL, inside the same transaction.
/// Returns the number of rows it touched.
type Backfill = fn(&Connection) -> rusqlite::Result<usize>;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
    backfill: Option<Backfill>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "items",
        sql: include_str!("0001_items.sql"),
        backfill: None,
    },
    Migration {
        version: 2,
        name: "tags",
        sql: include_str!("0002_tags.sql"),
        backfill: Some(backfill_tag_index),
    },
    Migration {
        version: 3,
        name: "items_fts",
        sql: include_str!("0003_items_fts.sql"),
        backfill: None,
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        let backfilled = match migration.backfill {
            Some(backfill) => backfill(&tx)?,
            None => 0,
        };
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=db_migrate module=db status=ok version={} name={} backfilled={backfilled}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

/// Rebuilds the tag index from legacy `items.tags` strings.
///
/// Earlier builds stored raw caption words (`#Work,`), so each string is
/// normalized, written back in `#a #b` form and linked through `item_tags`.
fn backfill_tag_index(conn: &Connection) -> rusqlite::Result<usize> {
    let mut stmt =
        conn.prepare("SELECT id, tags FROM items WHERE tags IS NOT NULL AND trim(tags) <> '';")?;
    let legacy = stmt
        .query_map([], |row| {
            Ok((row.get::<_, ItemId>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    drop(stmt);

    for (item_id, raw) in &legacy {
        let tags = parse_tag_list(raw);
        let normalized = format_tags(&tags);
        if normalized != *raw {
            conn.execute(
                "UPDATE items SET tags = ?1 WHERE id = ?2;",
                params![normalized, item_id],
            )?;
        }
        link_tags_in_tx(conn, *item_id, &tags)?;
    }

    Ok(legacy.len())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
