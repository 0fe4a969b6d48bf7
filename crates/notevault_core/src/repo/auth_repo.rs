//! Account and session repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist user accounts with their password digests.
//! - Persist session tokens mapping to authenticated accounts.
//!
//! # Invariants
//! - `users.username` is unique; duplicate inserts surface `UsernameTaken`.
//! - Password digests never appear in `User` records returned to services
//!   other than through `CredentialRow`.
//! - Session deletion is idempotent at the repository level.

use crate::model::user::{validate_username, User, UserId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult, TableRequirement};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Opaque session handle handed to clients after login.
pub type SessionToken = Uuid;

const AUTH_SCHEMA: &[TableRequirement] = &[
    TableRequirement {
        table: "users",
        columns: &["id", "username", "password_hash", "created_at"],
    },
    TableRequirement {
        table: "sessions",
        columns: &["token", "user_id", "created_at"],
    },
];

/// Account row including the stored credential digest.
///
/// Only the auth service consumes this; everything else sees `User`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRow {
    pub user: User,
    pub password_hash: String,
}

/// Repository interface for account and session operations.
pub trait AuthRepository {
    /// Creates one account with a pre-hashed credential.
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User>;
    /// Finds an account and its credential digest by login name.
    fn find_credentials(&self, username: &str) -> RepoResult<Option<CredentialRow>>;
    /// Gets one account by stable id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Records a new session for the given account.
    fn create_session(&self, token: SessionToken, user_id: UserId) -> RepoResult<()>;
    /// Resolves a session token to its account, `None` when absent.
    fn find_session_user(&self, token: SessionToken) -> RepoResult<Option<User>>;
    /// Deletes a session; returns whether a row was removed.
    fn delete_session(&self, token: SessionToken) -> RepoResult<bool>;
}

/// SQLite-backed account/session repository.
pub struct SqliteAuthRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, AUTH_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl AuthRepository for SqliteAuthRepository<'_> {
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        validate_username(username)?;

        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);",
            [username],
            |row| row.get(0),
        )?;
        if taken == 1 {
            return Err(RepoError::UsernameTaken(username.to_string()));
        }

        self.conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2);",
            params![username, password_hash],
        )?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    fn find_credentials(&self, username: &str) -> RepoResult<Option<CredentialRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1;",
                [username],
                |row| {
                    Ok(CredentialRow {
                        user: User {
                            id: row.get(0)?,
                            username: row.get(1)?,
                        },
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1;",
                [id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn create_session(&self, token: SessionToken, user_id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "INSERT INTO sessions (token, user_id)
             SELECT ?1, id FROM users WHERE id = ?2;",
            params![token.to_string(), user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::UserNotFound(user_id));
        }

        Ok(())
    }

    fn find_session_user(&self, token: SessionToken) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT u.id, u.username
                 FROM sessions s
                 INNER JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1;",
                [token.to_string()],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn delete_session(&self, token: SessionToken) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM sessions WHERE token = ?1;",
            [token.to_string()],
        )?;
        Ok(changed > 0)
    }
}
