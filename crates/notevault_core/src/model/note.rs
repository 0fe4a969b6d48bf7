//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and the `NewNote` input shape.
//! - Validate title and explicit-slug fields before persistence.
//!
//! # Invariants
//! - `slug` is globally unique and matches `[A-Za-z0-9_-]{1,100}`.
//! - `author_id` is set once at creation and never reassigned.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable note identifier (SQLite rowid).
pub type NoteId = i64;

pub const TITLE_MAX_CHARS: usize = 100;
pub const SLUG_MAX_CHARS: usize = 100;

/// Validation error for note fields.
///
/// Each variant names the offending field so callers can surface it the way
/// a form layer would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    TitleEmpty,
    TitleTooLong { chars: usize },
    SlugEmpty,
    SlugTooLong { chars: usize },
    SlugInvalidChar { ch: char },
    /// The title has no transliterable characters to derive a slug from.
    SlugNotDerivable,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleEmpty => write!(f, "title cannot be empty"),
            Self::TitleTooLong { chars } => {
                write!(f, "title is {chars} chars, maximum is {TITLE_MAX_CHARS}")
            }
            Self::SlugEmpty => write!(f, "slug cannot be empty"),
            Self::SlugTooLong { chars } => {
                write!(f, "slug is {chars} chars, maximum is {SLUG_MAX_CHARS}")
            }
            Self::SlugInvalidChar { ch } => {
                write!(f, "slug contains unsupported character `{ch}`")
            }
            Self::SlugNotDerivable => {
                write!(f, "slug cannot be derived from title; provide one explicitly")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note id.
    pub id: NoteId,
    /// Human-facing heading, also the slug-derivation source.
    pub title: String,
    /// Free-form body text.
    pub text: String,
    /// Unique URL-safe handle.
    pub slug: String,
    /// Owning account. Only this account can see or mutate the note.
    pub author_id: UserId,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last-update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// Input shape for note creation and full-replacement edits.
///
/// A `None` or blank `slug` requests auto-derivation from `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
}

impl NewNote {
    /// Validates the title field.
    ///
    /// Slug validation happens in the service after blank-slug resolution,
    /// because only the service knows whether the slug is explicit or derived.
    pub fn validate_title(&self) -> Result<(), NoteValidationError> {
        validate_title(&self.title)
    }

    /// Returns the explicit slug when one was provided and is non-blank.
    pub fn explicit_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Validates a note title.
pub fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::TitleEmpty);
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(NoteValidationError::TitleTooLong { chars });
    }
    Ok(())
}

/// Validates an explicit slug against the URL-safe contract.
pub fn validate_slug(slug: &str) -> Result<(), NoteValidationError> {
    if slug.is_empty() {
        return Err(NoteValidationError::SlugEmpty);
    }
    let chars = slug.chars().count();
    if chars > SLUG_MAX_CHARS {
        return Err(NoteValidationError::SlugTooLong { chars });
    }
    for ch in slug.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(NoteValidationError::SlugInvalidChar { ch });
        }
    }
    Ok(())
}
