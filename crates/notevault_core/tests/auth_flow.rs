use notevault_core::db::open_db_in_memory;
use notevault_core::model::user::UserValidationError;
use notevault_core::{AuthService, AuthServiceError, SqliteAuthRepository};
use uuid::Uuid;

#[test]
fn signup_then_login_then_resolve_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());

    let user = auth.signup("author", "pass").unwrap();
    assert_eq!(user.username, "author");

    let token = auth.login("author", "pass").unwrap();
    let resolved = auth.resolve(token).unwrap().unwrap();
    assert_eq!(resolved, user);
}

#[test]
fn duplicate_username_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());

    auth.signup("author", "pass").unwrap();
    let err = auth.signup("author", "other-pass").unwrap_err();
    assert!(matches!(err, AuthServiceError::UsernameTaken(name) if name == "author"));
}

#[test]
fn unknown_user_and_wrong_password_fail_the_same_way() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());
    auth.signup("author", "pass").unwrap();

    let unknown = auth.login("ghost", "pass").unwrap_err();
    let wrong = auth.login("author", "bad-pass").unwrap_err();
    assert!(matches!(unknown, AuthServiceError::InvalidCredentials));
    assert!(matches!(wrong, AuthServiceError::InvalidCredentials));
}

#[test]
fn logout_closes_the_session_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());
    auth.signup("author", "pass").unwrap();

    let token = auth.login("author", "pass").unwrap();
    assert!(auth.resolve(token).unwrap().is_some());

    auth.logout(token).unwrap();
    assert!(auth.resolve(token).unwrap().is_none());

    // Second logout with the same token is a no-op, not an error.
    auth.logout(token).unwrap();
}

#[test]
fn unknown_token_resolves_to_anonymous() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());

    assert!(auth.resolve(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn each_login_opens_an_independent_session() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());
    auth.signup("author", "pass").unwrap();

    let first = auth.login("author", "pass").unwrap();
    let second = auth.login("author", "pass").unwrap();
    assert_ne!(first, second);

    auth.logout(first).unwrap();
    assert!(auth.resolve(first).unwrap().is_none());
    assert!(auth.resolve(second).unwrap().is_some());
}

#[test]
fn signup_rejects_invalid_fields() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());

    let empty_password = auth.signup("author", "").unwrap_err();
    assert!(matches!(
        empty_password,
        AuthServiceError::Validation(UserValidationError::PasswordEmpty)
    ));

    let bad_username = auth.signup("has space", "pass").unwrap_err();
    assert!(matches!(
        bad_username,
        AuthServiceError::Validation(UserValidationError::UsernameInvalidChar { ch: ' ' })
    ));
}
