use notevault_core::{NewNote, Note};

#[test]
fn note_serialization_uses_expected_wire_fields() {
    let note = Note {
        id: 7,
        title: "Wire Note".to_string(),
        text: "body".to_string(),
        slug: "wire-note".to_string(),
        author_id: 3,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_360_000,
    };

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["title"], "Wire Note");
    assert_eq!(json["text"], "body");
    assert_eq!(json["slug"], "wire-note");
    assert_eq!(json["author_id"], 3);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["updated_at"], 1_700_000_360_000_i64);

    let decoded: Note = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn new_note_deserializes_with_optional_slug() {
    let with_slug: NewNote = serde_json::from_value(serde_json::json!({
        "title": "Новая заметка",
        "text": "Текст заметки",
        "slug": "new_note"
    }))
    .unwrap();
    assert_eq!(with_slug.explicit_slug(), Some("new_note"));

    let without_slug: NewNote = serde_json::from_value(serde_json::json!({
        "title": "Auto",
        "text": "t",
        "slug": null
    }))
    .unwrap();
    assert_eq!(without_slug.explicit_slug(), None);
}
