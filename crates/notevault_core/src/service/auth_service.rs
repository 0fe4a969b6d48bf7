//! Account and session use-case service.
//!
//! # Responsibility
//! - Provide signup/login/logout/resolve entry points for core callers.
//! - Own password hashing and verification.
//!
//! # Invariants
//! - Raw passwords are hashed before they reach the repository.
//! - Unknown username and wrong password produce the same error, so a
//!   caller cannot probe which accounts exist.
//! - Logout is idempotent.

use crate::model::user::{validate_password, validate_username, User};
use crate::repo::auth_repo::{AuthRepository, SessionToken};
use crate::repo::RepoError;
use log::info;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const HASH_SCHEME: &str = "sha256";

/// Service error for account and session use-cases.
#[derive(Debug)]
pub enum AuthServiceError {
    /// Username or password failed field validation.
    Validation(crate::model::user::UserValidationError),
    /// Another account already owns this login name.
    UsernameTaken(String),
    /// Unknown username or wrong password; deliberately indistinct.
    InvalidCredentials,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UsernameTaken(username) => {
                write!(f, "username already taken: {username}")
            }
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UsernameTaken(username) => Self::UsernameTaken(username),
            RepoError::UserValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Auth service facade over repository implementations.
pub struct AuthService<R: AuthRepository> {
    repo: R,
}

impl<R: AuthRepository> AuthService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new account from a login name and raw password.
    pub fn signup(&self, username: &str, password: &str) -> Result<User, AuthServiceError> {
        validate_username(username).map_err(AuthServiceError::Validation)?;
        validate_password(password).map_err(AuthServiceError::Validation)?;

        let user = self.repo.create_user(username, &hash_password(password))?;
        info!(
            "event=signup module=auth status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Verifies credentials and opens a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthServiceError> {
        let Some(credentials) = self.repo.find_credentials(username)? else {
            info!("event=login module=auth status=rejected reason=unknown_user");
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash) {
            info!(
                "event=login module=auth status=rejected reason=bad_password user_id={}",
                credentials.user.id
            );
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = Uuid::new_v4();
        self.repo.create_session(token, credentials.user.id)?;
        info!(
            "event=login module=auth status=ok user_id={}",
            credentials.user.id
        );
        Ok(token)
    }

    /// Closes a session. Unknown tokens are a no-op.
    pub fn logout(&self, token: SessionToken) -> Result<(), AuthServiceError> {
        let removed = self.repo.delete_session(token)?;
        info!("event=logout module=auth status=ok removed={removed}");
        Ok(())
    }

    /// Resolves a session token to its account, `None` when the session
    /// does not exist (never opened, or closed by logout).
    pub fn resolve(&self, token: SessionToken) -> Result<Option<User>, AuthServiceError> {
        Ok(self.repo.find_session_user(token)?)
    }
}

/// Hashes a raw password as `sha256:<salt-hex>:<digest-hex>`.
///
/// The salt is 16 random bytes; the digest is SHA-256 over salt + password.
fn hash_password(password: &str) -> String {
    let salt = *Uuid::new_v4().as_bytes();
    let digest = salted_digest(&salt, password);
    format!("{HASH_SCHEME}:{}:{}", hex::encode(salt), hex::encode(digest))
}

/// Verifies a raw password against a stored `sha256:<salt>:<digest>` value.
///
/// Malformed stored values verify as false instead of erroring, so a
/// corrupt row behaves like a wrong password.
fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, ':');
    let (Some(scheme), Some(salt_hex), Some(digest_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    hex::encode(salted_digest(&salt, password)) == digest_hex
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
