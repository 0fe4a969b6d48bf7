//! Note use-case service with author-only access control.
//!
//! # Responsibility
//! - Provide note create/get/list/update/delete APIs for core callers.
//! - Resolve blank slugs by deriving them from the title.
//! - Reject anonymous callers before storage is touched.
//!
//! # Invariants
//! - Every operation requires an authenticated actor.
//! - Detail/edit/delete are visible only to the note's author; any other
//!   actor gets `NoteNotFound`, never a "forbidden" that would leak
//!   existence.
//! - `update_note` uses full replacement semantics for title/text/slug.

use crate::model::note::{validate_slug, NewNote, Note, NoteValidationError};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use crate::slug::slugify;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Caller is not logged in; the web layer turns this into a login
    /// redirect.
    NotAuthenticated,
    /// Title or slug failed field validation.
    Validation(NoteValidationError),
    /// Another note already owns the requested slug.
    SlugTaken(String),
    /// No note with this slug is visible to the actor.
    NoteNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "authentication required"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::SlugTaken(slug) => write!(f, "slug already taken: {slug}"),
            Self::NoteNotFound(slug) => write!(f, "note not found: {slug}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(slug) => Self::NoteNotFound(slug),
            RepoError::SlugTaken(slug) => Self::SlugTaken(slug),
            RepoError::NoteValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by the actor.
    ///
    /// A blank input slug is derived from the title; an explicit slug is
    /// validated against the URL-safe contract. Duplicate slugs fail with
    /// `SlugTaken` naming the offending value.
    pub fn create_note(
        &self,
        actor: Option<UserId>,
        input: &NewNote,
    ) -> Result<Note, NoteServiceError> {
        let author_id = require_actor(actor)?;
        input.validate_title()?;
        let slug = resolve_slug(input)?;

        let note = self
            .repo
            .create_note(author_id, &input.title, &input.text, &slug)?;
        info!(
            "event=note_create module=notes status=ok note_id={} author_id={author_id}",
            note.id
        );
        Ok(note)
    }

    /// Gets one note by slug. Author-only.
    pub fn get_note(&self, actor: Option<UserId>, slug: &str) -> Result<Note, NoteServiceError> {
        let author_id = require_actor(actor)?;
        self.repo
            .get_note_for_author(slug, author_id)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(slug.to_string()))
    }

    /// Lists the actor's notes ordered by id ascending.
    pub fn list_notes(&self, actor: Option<UserId>) -> Result<Vec<Note>, NoteServiceError> {
        let author_id = require_actor(actor)?;
        Ok(self.repo.list_notes_for_author(author_id)?)
    }

    /// Replaces title/text/slug of the actor's note identified by `slug`.
    ///
    /// A blank input slug re-derives from the new title. Moving to a slug
    /// held by another note fails with `SlugTaken`; keeping the current
    /// slug is always allowed.
    pub fn update_note(
        &self,
        actor: Option<UserId>,
        slug: &str,
        input: &NewNote,
    ) -> Result<Note, NoteServiceError> {
        let author_id = require_actor(actor)?;
        input.validate_title()?;
        let new_slug = resolve_slug(input)?;

        let note =
            self.repo
                .update_note_for_author(slug, author_id, &input.title, &input.text, &new_slug)?;
        info!(
            "event=note_update module=notes status=ok note_id={} author_id={author_id}",
            note.id
        );
        Ok(note)
    }

    /// Hard-deletes the actor's note identified by `slug`.
    pub fn delete_note(&self, actor: Option<UserId>, slug: &str) -> Result<(), NoteServiceError> {
        let author_id = require_actor(actor)?;
        self.repo.delete_note_for_author(slug, author_id)?;
        info!("event=note_delete module=notes status=ok slug={slug} author_id={author_id}");
        Ok(())
    }
}

fn require_actor(actor: Option<UserId>) -> Result<UserId, NoteServiceError> {
    actor.ok_or(NoteServiceError::NotAuthenticated)
}

/// Resolves the effective slug for a create/update input.
fn resolve_slug(input: &NewNote) -> Result<String, NoteValidationError> {
    match input.explicit_slug() {
        Some(slug) => {
            validate_slug(slug)?;
            Ok(slug.to_string())
        }
        None => {
            let derived = slugify(&input.title);
            if derived.is_empty() {
                return Err(NoteValidationError::SlugNotDerivable);
            }
            Ok(derived)
        }
    }
}
