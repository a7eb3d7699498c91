use serde::{Deserialize, Serialize};

/// Kind of content unit a block represents
///
/// Unrecognised type names deserialize to `Unknown` so that diffs produced
/// by a newer change detector still render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Board,
    View,
    Card,
    Text,
    Image,
    Divider,
    Comment,
    Checkbox,
    Attachment,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Board => "board",
            BlockType::View => "view",
            BlockType::Card => "card",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Divider => "divider",
            BlockType::Comment => "comment",
            BlockType::Checkbox => "checkbox",
            BlockType::Attachment => "attachment",
            BlockType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one block on one side of a diff
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub id: String,

    pub parent_id: String,

    /// Text payload: card title, comment body, attachment file name, ...
    pub title: String,

    /// Deletion timestamp in milliseconds; zero while the block is live
    pub delete_at: i64,
}

impl Block {
    /// Create a live block with the given id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    /// Builder for a tombstoned block
    pub fn deleted_at(mut self, delete_at: i64) -> Self {
        self.delete_at = delete_at;
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }
}

/// Board owning the card a diff belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Board {
    pub id: String,
    pub team_id: String,
    pub title: String,
    pub description: String,
}

impl Board {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = team_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_unknown_fallback() {
        let t: BlockType = serde_json::from_str("\"checklist-v2\"").unwrap();
        assert_eq!(t, BlockType::Unknown);
        let t: BlockType = serde_json::from_str("\"divider\"").unwrap();
        assert_eq!(t, BlockType::Divider);
    }

    #[test]
    fn test_block_deleted_marker() {
        let b = Block::new("b1", "Title");
        assert!(!b.is_deleted());
        assert!(b.deleted_at(1_700_000_000_000).is_deleted());
    }

    #[test]
    fn test_block_defaults_from_partial_json() {
        let b: Block = serde_json::from_str(r#"{"id":"b1","title":"T"}"#).unwrap();
        assert_eq!(b.parent_id, "");
        assert_eq!(b.delete_at, 0);
    }
}
