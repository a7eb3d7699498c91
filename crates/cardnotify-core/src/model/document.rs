//! Card document records kept by the document store.
//!
//! A card document is the editor's binary snapshot of a card's rich
//! content, stored alongside the card and addressed by card id.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{NotifyError, Result};

/// Editor snapshot of one card's content
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    /// Document id (usually the card id)
    pub doc_id: String,
    pub card_id: String,
    pub board_id: String,

    /// Opaque editor state; never serialized with the metadata
    #[serde(skip)]
    pub snapshot: Option<Vec<u8>>,

    /// Creation time, milliseconds since the epoch
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
}

impl CardDocument {
    /// Create a document stamped with the current time
    pub fn new(
        doc_id: impl Into<String>,
        card_id: impl Into<String>,
        board_id: impl Into<String>,
        snapshot: Vec<u8>,
        author: impl Into<String>,
    ) -> Self {
        let now = Utc::now().timestamp_millis();
        let author = author.into();
        Self {
            doc_id: doc_id.into(),
            card_id: card_id.into(),
            board_id: board_id.into(),
            snapshot: Some(snapshot),
            created_at: now,
            updated_at: now,
            created_by: author.clone(),
            updated_by: author,
        }
    }

    /// Check the fields the store relies on
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        let missing = if self.doc_id.is_empty() {
            Some("doc_id cannot be empty")
        } else if self.card_id.is_empty() {
            Some("card_id cannot be empty")
        } else if self.board_id.is_empty() {
            Some("board_id cannot be empty")
        } else if self.snapshot.is_none() {
            Some("snapshot cannot be nil")
        } else {
            None
        };

        match missing {
            Some(reason) => Err(NotifyError::InvalidDocument {
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Metadata view without the snapshot bytes
    pub fn to_info(&self) -> CardDocumentInfo {
        CardDocumentInfo {
            doc_id: self.doc_id.clone(),
            card_id: self.card_id.clone(),
            board_id: self.board_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by.clone(),
            updated_by: self.updated_by.clone(),
        }
    }

    /// Apply a partial update in place
    pub fn apply_patch(&mut self, patch: CardDocumentPatch) {
        if let Some(snapshot) = patch.snapshot {
            self.snapshot = Some(snapshot);
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
        if let Some(updated_by) = patch.updated_by {
            self.updated_by = updated_by;
        }
    }
}

/// Card document metadata, for listings that must not load snapshots
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocumentInfo {
    pub doc_id: String,
    pub card_id: String,
    pub board_id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
}

/// Partial update to a card document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardDocumentPatch {
    pub snapshot: Option<Vec<u8>>,
    pub updated_at: Option<i64>,
    pub updated_by: Option<String>,
}

impl CardDocumentPatch {
    /// Patch replacing the snapshot, stamped now and attributed to `user`
    pub fn snapshot_by(snapshot: Vec<u8>, user: impl Into<String>) -> Self {
        Self {
            snapshot: Some(snapshot),
            updated_at: Some(Utc::now().timestamp_millis()),
            updated_by: Some(user.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> CardDocument {
        CardDocument::new("d1", "c1", "b1", vec![1, 2, 3], "u1")
    }

    #[test]
    fn test_new_document_is_valid() {
        assert!(doc().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut d = doc();
        d.card_id.clear();
        d.board_id.clear();
        match d.validate() {
            Err(NotifyError::InvalidDocument { reason }) => {
                assert_eq!(reason, "card_id cannot be empty")
            }
            other => panic!("unexpected: {:?}", other),
        }

        let mut d = doc();
        d.snapshot = None;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut d = doc();
        let created_by = d.created_by.clone();
        d.apply_patch(CardDocumentPatch {
            snapshot: None,
            updated_at: Some(42),
            updated_by: Some("u2".to_string()),
        });
        assert_eq!(d.snapshot, Some(vec![1, 2, 3]));
        assert_eq!(d.updated_at, 42);
        assert_eq!(d.updated_by, "u2");
        assert_eq!(d.created_by, created_by);
    }

    #[test]
    fn test_info_json_omits_snapshot() {
        let json = serde_json::to_string(&doc()).unwrap();
        assert!(json.contains("\"cardId\":\"c1\""));
        assert!(!json.contains("snapshot"));
        assert_eq!(doc().to_info().doc_id, "d1");
    }
}
