#![allow(clippy::unwrap_used, clippy::expect_used)]

use cardnotify_core::errors::ExErrorKind;
use cardnotify_store::migrations::{apply_migrations, applied_migrations, get_migrations};
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(table_names(&conn), vec!["card_documents", "schema_version"]);
    assert_eq!(applied_migrations(&conn).unwrap().len(), get_migrations().len());
}

#[test]
fn test_checksums_recorded() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_card_documents'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64);
}

#[test]
fn test_edited_migration_is_detected() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '001_card_documents'",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ChecksumMismatch);
    assert_eq!(err.entity_id(), Some("001_card_documents"));
}
