use notevault_core::db::open_db_in_memory;
use notevault_core::{
    AuthService, NewNote, NoteService, NoteServiceError, SqliteAuthRepository,
    SqliteNoteRepository, UserId,
};
use rusqlite::Connection;

fn signup(conn: &Connection, username: &str) -> UserId {
    let auth = AuthService::new(SqliteAuthRepository::try_new(conn).unwrap());
    auth.signup(username, "pass").unwrap().id
}

fn new_note(title: &str, slug: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        text: "text".to_string(),
        slug: Some(slug.to_string()),
    }
}

#[test]
fn author_can_view_edit_and_delete_own_note() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    notes
        .create_note(Some(author), &new_note("EditMe", "editme"))
        .unwrap();

    assert!(notes.get_note(Some(author), "editme").is_ok());
    assert!(notes
        .update_note(Some(author), "editme", &new_note("EditMe", "editme"))
        .is_ok());
    assert!(notes.delete_note(Some(author), "editme").is_ok());
}

#[test]
fn other_authenticated_user_gets_not_found_not_forbidden() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let reader = signup(&conn, "reader");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    notes
        .create_note(Some(author), &new_note("OtherNote", "othernote"))
        .unwrap();

    let view = notes.get_note(Some(reader), "othernote").unwrap_err();
    assert!(matches!(view, NoteServiceError::NoteNotFound(slug) if slug == "othernote"));

    let edit = notes
        .update_note(Some(reader), "othernote", &new_note("Hijack", "othernote"))
        .unwrap_err();
    assert!(matches!(edit, NoteServiceError::NoteNotFound(_)));

    let delete = notes.delete_note(Some(reader), "othernote").unwrap_err();
    assert!(matches!(delete, NoteServiceError::NoteNotFound(_)));

    // The note is untouched for its author.
    let intact = notes.get_note(Some(author), "othernote").unwrap();
    assert_eq!(intact.title, "OtherNote");
}

#[test]
fn someone_elses_note_is_indistinguishable_from_a_missing_one() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let reader = signup(&conn, "reader");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    notes
        .create_note(Some(author), &new_note("Secret", "secret"))
        .unwrap();

    let foreign = notes.get_note(Some(reader), "secret").unwrap_err();
    let missing = notes.get_note(Some(reader), "no-such-note").unwrap_err();
    assert!(matches!(&foreign, NoteServiceError::NoteNotFound(slug) if slug == "secret"));
    assert!(matches!(&missing, NoteServiceError::NoteNotFound(slug) if slug == "no-such-note"));
}

#[test]
fn anonymous_caller_is_rejected_and_nothing_is_persisted() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let create = notes.create_note(None, &new_note("New Note", "new-note")).unwrap_err();
    assert!(matches!(create, NoteServiceError::NotAuthenticated));

    let list = notes.list_notes(None).unwrap_err();
    assert!(matches!(list, NoteServiceError::NotAuthenticated));

    let get = notes.get_note(None, "new-note").unwrap_err();
    assert!(matches!(get, NoteServiceError::NotAuthenticated));

    // No row was written by the rejected create.
    assert!(notes.list_notes(Some(author)).unwrap().is_empty());
}

#[test]
fn anonymous_cannot_edit_or_delete_existing_notes() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    notes
        .create_note(Some(author), &new_note("Keep", "keep"))
        .unwrap();

    let edit = notes
        .update_note(None, "keep", &new_note("Hijack", "keep"))
        .unwrap_err();
    assert!(matches!(edit, NoteServiceError::NotAuthenticated));

    let delete = notes.delete_note(None, "keep").unwrap_err();
    assert!(matches!(delete, NoteServiceError::NotAuthenticated));

    assert!(notes.get_note(Some(author), "keep").is_ok());
}

#[test]
fn list_contains_only_the_actors_notes_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let author = signup(&conn, "author");
    let reader = signup(&conn, "reader");
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    notes
        .create_note(Some(author), &new_note("Mine First", "mine-first"))
        .unwrap();
    notes
        .create_note(Some(reader), &new_note("Theirs", "theirs"))
        .unwrap();
    notes
        .create_note(Some(author), &new_note("Mine Second", "mine-second"))
        .unwrap();

    let mine = notes.list_notes(Some(author)).unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].slug, "mine-first");
    assert_eq!(mine[1].slug, "mine-second");
    assert!(mine.iter().all(|note| note.author_id == author));

    let theirs = notes.list_notes(Some(reader)).unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].slug, "theirs");
}

#[test]
fn session_resolution_drives_actor_identity() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    auth.signup("author", "pass").unwrap();
    let token = auth.login("author", "pass").unwrap();
    let actor = auth.resolve(token).unwrap().map(|user| user.id);

    notes
        .create_note(actor, &new_note("Session Note", "session-note"))
        .unwrap();

    // After logout the same token no longer yields an actor, and the
    // anonymous caller is rejected.
    auth.logout(token).unwrap();
    let actor_after_logout = auth.resolve(token).unwrap().map(|user| user.id);
    let err = notes
        .get_note(actor_after_logout, "session-note")
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NotAuthenticated));
}
