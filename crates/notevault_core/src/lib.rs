//! Core domain logic for notevault.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NewNote, Note, NoteId, NoteValidationError};
pub use model::user::{User, UserId, UserValidationError};
pub use repo::auth_repo::{AuthRepository, SessionToken, SqliteAuthRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthService, AuthServiceError};
pub use service::note_service::{NoteService, NoteServiceError};
pub use slug::slugify;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
