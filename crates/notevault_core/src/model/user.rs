//! Account domain model.
//!
//! # Responsibility
//! - Define the `User` record and username/password validation rules.
//!
//! # Invariants
//! - `username` is unique across all accounts (enforced by storage).
//! - Password material never leaves the auth service; `User` carries no
//!   credential fields.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable account identifier (SQLite rowid).
pub type UserId = i64;

pub const USERNAME_MAX_CHARS: usize = 150;

/// Validation error for account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    UsernameEmpty,
    UsernameTooLong { chars: usize },
    UsernameInvalidChar { ch: char },
    PasswordEmpty,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameEmpty => write!(f, "username cannot be empty"),
            Self::UsernameTooLong { chars } => write!(
                f,
                "username is {chars} chars, maximum is {USERNAME_MAX_CHARS}"
            ),
            Self::UsernameInvalidChar { ch } => {
                write!(f, "username contains unsupported character `{ch}`")
            }
            Self::PasswordEmpty => write!(f, "password cannot be empty"),
        }
    }
}

impl Error for UserValidationError {}

/// Authenticated account record exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account id.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
}

/// Validates a login name against the account-name contract.
///
/// Allowed characters: letters, digits, and `@` `.` `+` `-` `_`.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::UsernameEmpty);
    }
    let chars = username.chars().count();
    if chars > USERNAME_MAX_CHARS {
        return Err(UserValidationError::UsernameTooLong { chars });
    }
    for ch in username.chars() {
        if !ch.is_alphanumeric() && !matches!(ch, '@' | '.' | '+' | '-' | '_') {
            return Err(UserValidationError::UsernameInvalidChar { ch });
        }
    }
    Ok(())
}

/// Validates raw password input before hashing.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::PasswordEmpty);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_password, validate_username, UserValidationError, USERNAME_MAX_CHARS};

    #[test]
    fn accepts_typical_usernames() {
        for name in ["author", "user1", "first.last+tag@example.com", "a-b_c"] {
            assert_eq!(validate_username(name), Ok(()), "rejected `{name}`");
        }
    }

    #[test]
    fn rejects_empty_and_oversized_usernames() {
        assert_eq!(validate_username(""), Err(UserValidationError::UsernameEmpty));

        let long = "a".repeat(USERNAME_MAX_CHARS + 1);
        assert_eq!(
            validate_username(&long),
            Err(UserValidationError::UsernameTooLong {
                chars: USERNAME_MAX_CHARS + 1
            })
        );
    }

    #[test]
    fn rejects_unsupported_username_characters() {
        assert_eq!(
            validate_username("has space"),
            Err(UserValidationError::UsernameInvalidChar { ch: ' ' })
        );
        assert_eq!(
            validate_username("slash/name"),
            Err(UserValidationError::UsernameInvalidChar { ch: '/' })
        );
    }

    #[test]
    fn rejects_empty_password() {
        assert_eq!(
            validate_password(""),
            Err(UserValidationError::PasswordEmpty)
        );
        assert_eq!(validate_password("pass"), Ok(()));
    }
}
