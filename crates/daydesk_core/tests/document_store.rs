use daydesk_core::{
    open_db, open_db_in_memory, BoardConfig, DateKey, DocumentStore, EntityId, Note, NoteTab,
    SqliteDocumentStore, StoreError, UserDocument, Zone,
};
use serde_json::json;

#[test]
fn unknown_user_loads_empty_document() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, BoardConfig::default());

    let document = store.load_user_data("nobody").unwrap();
    assert_eq!(document, UserDocument::default());
}

#[test]
fn save_then_load_returns_same_document() {
    let config = BoardConfig::default();
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, config.clone());

    let date = DateKey::parse("2024-05-01").ok();
    let zone = Zone::new(&config, date);
    let tabs = vec![NoteTab::new("Plan", "ship it"), NoteTab::new("Log", "")];
    let mut note = Note::new(&config, date, Some(zone.id.clone()))
        .with_tabs(tabs, 1)
        .unwrap();
    note.x = 123.0;
    let document = UserDocument {
        notes: vec![note],
        zones: vec![zone],
        video_url: "https://www.youtube.com/watch?v=abc".to_string(),
    };

    store.save_user_data("u1", &document).unwrap();
    assert_eq!(store.load_user_data("u1").unwrap(), document);
    assert_eq!(store.load_user_data("other").unwrap(), UserDocument::default());
}

#[test]
fn second_save_replaces_whole_document() {
    let config = BoardConfig::default();
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, config.clone());

    let first = UserDocument {
        notes: vec![Note::new(&config, None, None), Note::new(&config, None, None)],
        ..UserDocument::default()
    };
    store.save_user_data("u1", &first).unwrap();
    store.save_user_data("u1", &UserDocument::default()).unwrap();

    assert!(store.load_user_data("u1").unwrap().notes.is_empty());
}

#[test]
fn legacy_single_content_note_loads_as_five_tabs() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, BoardConfig::default());
    let legacy = json!({
        "notes": [{
            "id": 1700000000123.25,
            "x": 40, "y": 60,
            "date": "2023-11-14",
            "zoneId": null,
            "content": "remember the milk"
        }],
        "zones": [{ "id": 17, "title": "Home", "x": 0, "y": 0, "date": null }],
        "youtubeUrl": "https://youtu.be/xyz"
    });
    store.import_raw("u1", &legacy.to_string()).unwrap();

    let document = store.load_user_data("u1").unwrap();
    let note = &document.notes[0];
    assert_eq!(note.id, EntityId::from("1700000000123.25"));
    assert_eq!(note.tabs().len(), 5);
    assert_eq!(note.tabs()[0].content, "remember the milk");
    assert!(note.tabs()[1..].iter().all(|tab| tab.content.is_empty()));
    assert_eq!(note.tabs()[4].name, "Note 5");
    assert_eq!(note.active_tab_index(), 0);
    assert_eq!((note.width, note.height), (320.0, 240.0));

    let zone = &document.zones[0];
    assert_eq!(zone.id, EntityId::from("17"));
    assert_eq!((zone.width, zone.height), (400.0, 300.0));
    assert_eq!(document.video_url, "https://youtu.be/xyz");

    // A save writes the current shape back.
    store.save_user_data("u1", &document).unwrap();
    let payload: String = conn
        .query_row(
            "SELECT payload FROM user_documents WHERE user_id = 'u1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let stored: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert!(stored["notes"][0].get("content").is_none());
    assert!(stored.get("youtubeUrl").is_none());
    assert_eq!(stored["videoUrl"], "https://youtu.be/xyz");
    assert_eq!(stored["notes"][0]["activeTabIndex"], 0);
}

#[test]
fn corrupt_payload_reports_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, BoardConfig::default());
    store.import_raw("u1", "[1, 2, 3]").unwrap();

    let err = store.load_user_data("u1").unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)), "unexpected: {err}");

    store.import_raw("u2", "{not json").unwrap();
    assert!(matches!(
        store.load_user_data("u2").unwrap_err(),
        StoreError::Serialization(_)
    ));
}

#[test]
fn blank_user_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn, BoardConfig::default());

    let err = store
        .save_user_data("   ", &UserDocument::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidUserId(_)));
}

#[test]
fn documents_survive_reopening_file_database() {
    let config = BoardConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    let document = UserDocument {
        zones: vec![Zone::new(&config, None)],
        ..UserDocument::default()
    };
    {
        let conn = open_db(&path).unwrap();
        let store = SqliteDocumentStore::new(&conn, config.clone());
        store.save_user_data("u1", &document).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteDocumentStore::new(&conn, config);
    assert_eq!(store.load_user_data("u1").unwrap(), document);
}
