//! Before/after comparison tree consumed by the renderer.
//!
//! Diffs are produced by the change detector and only ever read here. The
//! tree owns its children, so it cannot contain cycles.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::block::{Block, BlockType, Board};

/// How one diff node changed, derived from which sides are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    /// Neither side present: a degenerate diff that renders nothing
    Skip,
}

impl ChangeKind {
    /// Classify a pair of snapshots
    ///
    /// A new-side block carrying a deletion marker counts as a deletion as
    /// long as an old side exists to have been deleted.
    pub fn classify(new_block: Option<&Block>, old_block: Option<&Block>) -> Self {
        match (new_block, old_block) {
            (None, None) => ChangeKind::Skip,
            (Some(_), None) => ChangeKind::Added,
            (None, Some(_)) => ChangeKind::Deleted,
            (Some(new), Some(_)) if new.is_deleted() => ChangeKind::Deleted,
            (Some(_), Some(_)) => ChangeKind::Modified,
        }
    }
}

/// Set of author ids with first-seen insertion order
///
/// Iteration order is the order ids were first inserted, which keeps the
/// rendered "@a, @b" list stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AuthorSet {
    ids: Vec<String>,
}

impl AuthorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id; returns false when it was already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AuthorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AuthorSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl From<Vec<String>> for AuthorSet {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<AuthorSet> for Vec<String> {
    fn from(set: AuthorSet) -> Self {
        set.ids
    }
}

/// Old/new textual value of one named card property
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropDiff {
    pub name: String,
    pub old_value: String,
    pub new_value: String,
}

impl PropDiff {
    pub fn new(
        name: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn is_changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

/// One node of the comparison tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    #[serde(default)]
    pub board: Option<Board>,

    /// The card this node belongs to (the node itself for card diffs)
    #[serde(default)]
    pub card: Option<Block>,

    #[serde(default)]
    pub authors: AuthorSet,

    pub block_type: BlockType,

    #[serde(default)]
    pub new_block: Option<Block>,

    #[serde(default)]
    pub old_block: Option<Block>,

    #[serde(default)]
    pub prop_diffs: Vec<PropDiff>,

    /// Child nodes in document order
    #[serde(default)]
    pub diffs: Vec<Diff>,
}

impl Diff {
    /// Create an empty diff of the given block type
    pub fn new(block_type: BlockType) -> Self {
        Self {
            block_type,
            ..Self::default()
        }
    }

    pub fn change_kind(&self) -> ChangeKind {
        ChangeKind::classify(self.new_block.as_ref(), self.old_block.as_ref())
    }

    pub fn new_title(&self) -> &str {
        self.new_block.as_ref().map_or("", |b| b.title.as_str())
    }

    pub fn old_title(&self) -> &str {
        self.old_block.as_ref().map_or("", |b| b.title.as_str())
    }

    /// The card this diff belongs to
    ///
    /// A card diff without a back-reference is its own card: the new side
    /// if present, otherwise the old one.
    pub fn card_block(&self) -> Option<&Block> {
        match (&self.card, self.block_type) {
            (Some(card), _) => Some(card),
            (None, BlockType::Card) => self.new_block.as_ref().or(self.old_block.as_ref()),
            (None, _) => None,
        }
    }

    /// Id of the card this diff concerns, for logging and error context
    pub fn card_id(&self) -> &str {
        self.card_block()
            .or(self.new_block.as_ref())
            .or(self.old_block.as_ref())
            .map_or("", |b| b.id.as_str())
    }

    /// Parse a JSON array of diffs as emitted by the change detector
    ///
    /// # Errors
    ///
    /// Returns `Serialization` when the document is not a diff array.
    pub fn list_from_json(json: &str) -> Result<Vec<Diff>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn board_id(&self) -> &str {
        self.board.as_ref().map_or("", |b| b.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_states() {
        let live = Block::new("b", "t");
        let dead = Block::new("b", "t").deleted_at(5);
        assert_eq!(ChangeKind::classify(None, None), ChangeKind::Skip);
        assert_eq!(ChangeKind::classify(Some(&live), None), ChangeKind::Added);
        assert_eq!(ChangeKind::classify(None, Some(&live)), ChangeKind::Deleted);
        assert_eq!(
            ChangeKind::classify(Some(&dead), Some(&live)),
            ChangeKind::Deleted
        );
        assert_eq!(
            ChangeKind::classify(Some(&live), Some(&live)),
            ChangeKind::Modified
        );
    }

    #[test]
    fn test_author_set_dedups_in_first_seen_order() {
        let set: AuthorSet = ["zoe", "adam", "zoe", "mia"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["zoe", "adam", "mia"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_author_set_serde_roundtrip_dedups() {
        let set: AuthorSet = serde_json::from_str(r#"["u1","u2","u1"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["u1","u2"]"#);
    }

    #[test]
    fn test_diff_from_json_with_children() {
        let json = r#"{
            "blockType": "card",
            "card": {"id": "c1", "title": "Card"},
            "newBlock": {"id": "c1", "title": "Card"},
            "authors": ["u1"],
            "diffs": [{"blockType": "text", "oldBlock": {"id": "t1", "title": "old"}}]
        }"#;
        let diff: Diff = serde_json::from_str(json).unwrap();
        assert_eq!(diff.block_type, BlockType::Card);
        assert_eq!(diff.change_kind(), ChangeKind::Added);
        assert_eq!(diff.diffs.len(), 1);
        assert_eq!(diff.diffs[0].change_kind(), ChangeKind::Deleted);
        assert_eq!(diff.card_id(), "c1");
    }

    #[test]
    fn test_card_diff_without_back_reference_is_its_own_card() {
        let mut diff = Diff::new(BlockType::Card);
        diff.new_block = Some(Block::new("c1", "Fix bug"));
        assert_eq!(diff.card_block().map(|b| b.id.as_str()), Some("c1"));

        diff.new_block = None;
        diff.old_block = Some(Block::new("c0", "Gone"));
        assert_eq!(diff.card_block().map(|b| b.title.as_str()), Some("Gone"));

        let mut child = Diff::new(BlockType::Text);
        child.new_block = Some(Block::new("t1", "text"));
        assert_eq!(child.card_block(), None);
    }

    #[test]
    fn test_list_from_json() {
        let diffs = Diff::list_from_json(r#"[{"blockType": "card"}, {"blockType": "text"}]"#).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[1].block_type, BlockType::Text);

        match Diff::list_from_json(r#"{"blockType": "card"}"#) {
            Err(crate::errors::NotifyError::Serialization { .. }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }
}
