//! Search entry points.
//!
//! # Responsibility
//! - Expose ranked keyword search backed by the `items_fts` index.
//! - Parse inline picker input into search options.

pub mod fts;
pub mod picker;
