use cardnotify_core::{
    Block, BlockType, Board, ConvertOptions, Diff, Labels, NotifyEngine, PropDiff,
    TemplateSources,
};

pub const BOARD_ID: &str = "board-1";
pub const CARD_ID: &str = "card-1";

/// Options using the English presets and plain links
#[allow(dead_code)]
pub fn english_options() -> ConvertOptions {
    ConvertOptions::new()
        .with_language("en")
        .with_labels(Labels::english())
        .with_templates(TemplateSources::english())
}

#[allow(dead_code)]
pub fn english_engine() -> NotifyEngine {
    NotifyEngine::new(english_options())
}

/// Card diff with the given sides, a board, and one author
#[allow(dead_code)]
pub fn card_diff(old_title: Option<&str>, new_title: Option<&str>) -> Diff {
    let mut diff = Diff::new(BlockType::Card);
    diff.board = Some(Board::new(BOARD_ID, "Roadmap").with_team_id("team-1"));
    diff.old_block = old_title.map(|t| Block::new(CARD_ID, t));
    diff.new_block = new_title.map(|t| Block::new(CARD_ID, t));
    diff.card = diff.new_block.clone().or_else(|| diff.old_block.clone());
    diff.authors.insert("alice");
    diff
}

/// Card diff with both sides present and the same title
#[allow(dead_code)]
pub fn unchanged_card(title: &str) -> Diff {
    card_diff(Some(title), Some(title))
}

/// Child diff of the given type
#[allow(dead_code)]
pub fn child(block_type: BlockType, old_title: Option<&str>, new_title: Option<&str>) -> Diff {
    let mut diff = Diff::new(block_type);
    diff.old_block = old_title.map(|t| Block::new("child-1", t).with_parent(CARD_ID));
    diff.new_block = new_title.map(|t| Block::new("child-1", t).with_parent(CARD_ID));
    diff
}

#[allow(dead_code)]
pub fn with_prop(mut diff: Diff, name: &str, old: &str, new: &str) -> Diff {
    diff.prop_diffs.push(PropDiff::new(name, old, new));
    diff
}
