//! SQLite repository for card documents
//!
//! Documents are addressed by card id. Writes are keyed by document id:
//! an upsert of an existing `doc_id` replaces the snapshot and the update
//! stamp, leaving the creation fields alone.

use std::time::Instant;

use cardnotify_core::model::{CardDocument, CardDocumentInfo, CardDocumentPatch};
use cardnotify_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{document_not_found, from_rusqlite, Result};

const SELECT_DOCUMENT: &str = "SELECT doc_id, card_id, board_id, snapshot, created_at, updated_at, created_by, updated_by
     FROM card_documents WHERE card_id = ?1 ORDER BY updated_at DESC LIMIT 1";

const SELECT_INFO: &str = "SELECT doc_id, card_id, board_id, created_at, updated_at, created_by, updated_by
     FROM card_documents WHERE card_id = ?1 ORDER BY updated_at DESC LIMIT 1";

/// Card document store
pub struct DocumentRepo;

impl DocumentRepo {
    /// Full document, snapshot included, for a card
    pub fn get_by_card_id(conn: &Connection, card_id: &str) -> Result<CardDocument> {
        conn.query_row(SELECT_DOCUMENT, [card_id], row_to_document)
            .optional()
            .map_err(from_rusqlite)?
            .ok_or_else(|| document_not_found("get_document", card_id))
    }

    /// Document metadata for a card, without loading the snapshot
    pub fn get_info_by_card_id(conn: &Connection, card_id: &str) -> Result<CardDocumentInfo> {
        conn.query_row(SELECT_INFO, [card_id], |row| {
            Ok(CardDocumentInfo {
                doc_id: row.get(0)?,
                card_id: row.get(1)?,
                board_id: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
                created_by: row.get(5)?,
                updated_by: row.get(6)?,
            })
        })
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| document_not_found("get_document_info", card_id))
    }

    /// Insert a document, or replace the snapshot of an existing `doc_id`
    pub fn upsert(conn: &Connection, doc: &CardDocument) -> Result<()> {
        log_op_start!("upsert_document", card_id = doc.card_id.as_str());
        let start = Instant::now();

        Self::upsert_impl(conn, doc).map_err(|e| {
            log_op_error!(
                "upsert_document",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "upsert_document",
            duration_ms = start.elapsed().as_millis() as u64,
            doc_id = doc.doc_id.as_str()
        );
        Ok(())
    }

    fn upsert_impl(conn: &Connection, doc: &CardDocument) -> Result<()> {
        doc.validate()?;

        conn.execute(
            "INSERT INTO card_documents (doc_id, card_id, board_id, snapshot, created_at, updated_at, created_by, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(doc_id) DO UPDATE SET
                snapshot = excluded.snapshot,
                updated_at = excluded.updated_at,
                updated_by = excluded.updated_by",
            rusqlite::params![
                doc.doc_id,
                doc.card_id,
                doc.board_id,
                doc.snapshot,
                doc.created_at,
                doc.updated_at,
                doc.created_by,
                doc.updated_by,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Delete every document of a card; deleting nothing is not an error
    pub fn delete_by_card_id(conn: &Connection, card_id: &str) -> Result<usize> {
        log_op_start!("delete_document", card_id = card_id);
        let start = Instant::now();

        let deleted = conn
            .execute("DELETE FROM card_documents WHERE card_id = ?1", [card_id])
            .map_err(from_rusqlite)
            .map_err(|e| {
                log_op_error!(
                    "delete_document",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "delete_document",
            duration_ms = start.elapsed().as_millis() as u64,
            deleted = deleted
        );
        Ok(deleted)
    }

    /// Apply a partial update to a card's document and store the result
    pub fn apply_patch(
        conn: &Connection,
        card_id: &str,
        patch: CardDocumentPatch,
    ) -> Result<CardDocument> {
        let mut doc = Self::get_by_card_id(conn, card_id)?;
        doc.apply_patch(patch);
        Self::upsert(conn, &doc)?;
        Ok(doc)
    }
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<CardDocument> {
    Ok(CardDocument {
        doc_id: row.get(0)?,
        card_id: row.get(1)?,
        board_id: row.get(2)?,
        snapshot: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        created_by: row.get(6)?,
        updated_by: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use cardnotify_core::errors::ExErrorKind;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_round_trip() {
        let conn = setup();
        let doc = CardDocument::new("doc-1", "card-1", "board-1", vec![1, 2, 3], "alice");
        DocumentRepo::upsert(&conn, &doc).unwrap();

        let loaded = DocumentRepo::get_by_card_id(&conn, "card-1").unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_missing_is_not_found() {
        let conn = setup();
        let err = DocumentRepo::get_by_card_id(&conn, "nope").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("nope"));
    }

    #[test]
    fn test_invalid_document_rejected() {
        let conn = setup();
        let mut doc = CardDocument::new("doc-1", "card-1", "board-1", vec![1], "alice");
        doc.snapshot = None;
        let err = DocumentRepo::upsert(&conn, &doc).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert_eq!(err.message(), "snapshot cannot be nil");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let conn = setup();
        assert_eq!(DocumentRepo::delete_by_card_id(&conn, "card-1").unwrap(), 0);
    }
}
