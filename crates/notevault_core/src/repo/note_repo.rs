//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide author-scoped CRUD APIs over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every read/write except `slug_exists` is constrained to
//!   `author_id = ?` in SQL; a non-author observes `NoteNotFound`.
//! - `notes.slug` is unique; duplicate writes surface `SlugTaken`.
//! - Write paths validate title/slug fields before SQL mutations.

use crate::model::note::{validate_slug, validate_title, Note};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult, TableRequirement};
use rusqlite::{params, Connection, ErrorCode, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    slug,
    author_id,
    created_at,
    updated_at
FROM notes";

const NOTE_SCHEMA: &[TableRequirement] = &[TableRequirement {
    table: "notes",
    columns: &[
        "id",
        "title",
        "text",
        "slug",
        "author_id",
        "created_at",
        "updated_at",
    ],
}];

/// Repository interface for author-scoped note CRUD operations.
pub trait NoteRepository {
    /// Inserts one note owned by `author_id` and returns the stored record.
    fn create_note(&self, author_id: UserId, title: &str, text: &str, slug: &str)
        -> RepoResult<Note>;
    /// Gets one note by slug, visible only to its author.
    fn get_note_for_author(&self, slug: &str, author_id: UserId) -> RepoResult<Option<Note>>;
    /// Lists the author's notes ordered by id ascending.
    fn list_notes_for_author(&self, author_id: UserId) -> RepoResult<Vec<Note>>;
    /// Replaces title/text/slug of the author's note identified by `slug`.
    fn update_note_for_author(
        &self,
        slug: &str,
        author_id: UserId,
        title: &str,
        text: &str,
        new_slug: &str,
    ) -> RepoResult<Note>;
    /// Hard-deletes the author's note identified by `slug`.
    fn delete_note_for_author(&self, slug: &str, author_id: UserId) -> RepoResult<()>;
    /// Returns whether any note (any author) already owns this slug.
    fn slug_exists(&self, slug: &str) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, NOTE_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(
        &self,
        author_id: UserId,
        title: &str,
        text: &str,
        slug: &str,
    ) -> RepoResult<Note> {
        validate_note_fields(title, slug)?;

        if self.slug_exists(slug)? {
            return Err(RepoError::SlugTaken(slug.to_string()));
        }

        let insert = self.conn.execute(
            "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4);",
            params![title, text, slug, author_id],
        );
        map_slug_conflict(insert, slug)?;

        let id = self.conn.last_insert_rowid();
        self.conn
            .query_row(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"), [id], |row| {
                parse_note_row(row)
            })
            .map_err(RepoError::from)
    }

    fn get_note_for_author(&self, slug: &str, author_id: UserId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE slug = ?1
               AND author_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![slug, author_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes_for_author(&self, author_id: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE author_id = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([author_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn update_note_for_author(
        &self,
        slug: &str,
        author_id: UserId,
        title: &str,
        text: &str,
        new_slug: &str,
    ) -> RepoResult<Note> {
        validate_note_fields(title, new_slug)?;

        if new_slug != slug && self.slug_exists(new_slug)? {
            return Err(RepoError::SlugTaken(new_slug.to_string()));
        }

        let update = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                text = ?2,
                slug = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE slug = ?4
               AND author_id = ?5;",
            params![title, text, new_slug, slug, author_id],
        );
        let changed = map_slug_conflict(update, new_slug)?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(slug.to_string()));
        }

        self.get_note_for_author(new_slug, author_id)?
            .ok_or_else(|| {
                RepoError::InvalidData(format!("updated note `{new_slug}` missing on read-back"))
            })
    }

    fn delete_note_for_author(&self, slug: &str, author_id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE slug = ?1 AND author_id = ?2;",
            params![slug, author_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(slug.to_string()));
        }

        Ok(())
    }

    fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE slug = ?1);",
            [slug],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn validate_note_fields(title: &str, slug: &str) -> RepoResult<()> {
    validate_title(title)?;
    validate_slug(slug)?;
    Ok(())
}

/// Maps a UNIQUE-constraint failure on `notes.slug` to `SlugTaken`.
///
/// The pre-insert existence check covers the normal path; this keeps the
/// schema constraint as the backstop instead of leaking a raw SQL error.
fn map_slug_conflict(result: Result<usize, rusqlite::Error>, slug: &str) -> RepoResult<usize> {
    match result {
        Ok(changed) => Ok(changed),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(RepoError::SlugTaken(slug.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_note_row(row: &Row<'_>) -> Result<Note, rusqlite::Error> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author_id: row.get("author_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
