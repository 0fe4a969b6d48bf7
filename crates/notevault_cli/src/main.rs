//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notevault_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use notevault_core::db::open_db_in_memory;
use notevault_core::{
    AuthService, NewNote, NoteService, SqliteAuthRepository, SqliteNoteRepository,
};

fn main() {
    println!("notevault_core ping={}", notevault_core::ping());
    println!("notevault_core version={}", notevault_core::core_version());

    // Exercise one full signup -> login -> note round trip against an
    // in-memory database so the binary doubles as a wiring check.
    if let Err(err) = smoke() {
        eprintln!("smoke check failed: {err}");
        std::process::exit(1);
    }
    println!("smoke=ok");
}

fn smoke() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;

    let auth = AuthService::new(SqliteAuthRepository::try_new(&conn)?);
    let user = auth.signup("smoke", "smoke-pass")?;
    let token = auth.login("smoke", "smoke-pass")?;
    let actor = auth.resolve(token)?.map(|user| user.id);

    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
    let note = notes.create_note(
        actor,
        &NewNote {
            title: "Smoke note".to_string(),
            text: "created by the CLI smoke probe".to_string(),
            slug: None,
        },
    )?;
    println!("smoke note slug={} author={}", note.slug, user.username);

    notes.delete_note(actor, &note.slug)?;
    auth.logout(token)?;
    Ok(())
}
