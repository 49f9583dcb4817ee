//! Domain model for saved items.
//!
//! # Responsibility
//! - Define the item record shared by bot handlers, search and export.
//! - Keep one storage shape for links, files and notes.
//!
//! # Invariants
//! - Every item is identified by a numeric `ItemId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
