//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep bot and CLI layers decoupled from storage details.

pub mod item_service;
