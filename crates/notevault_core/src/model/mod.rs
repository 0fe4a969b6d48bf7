//! Domain model for accounts and notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep field-level validation next to the records it protects.
//!
//! # Invariants
//! - Every note belongs to exactly one author.
//! - Note slugs are globally unique and URL-safe.

pub mod note;
pub mod user;
