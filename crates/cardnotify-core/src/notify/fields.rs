//! Field generators: one per change category, each appending to a field list.
//!
//! Generators only read the diff. They assume a modified card (both sides
//! present); the attachment builder guarantees that before calling them.

use tracing::{debug, trace};

use crate::config::Labels;
use crate::format::{make_authors_list, replaced, strip_newlines};
use crate::model::{AttachmentField, BlockType, ChangeKind, Diff};
use crate::textdiff::TextDiffer;

use super::mention::MentionFilter;

/// Title field when the card title changed
pub fn append_title_changes(fields: &mut Vec<AttachmentField>, card_diff: &Diff, labels: &Labels) {
    let new_title = card_diff.new_title();
    let old_title = card_diff.old_title();
    if new_title != old_title {
        fields.push(AttachmentField::new(
            labels.title.as_str(),
            replaced(&strip_newlines(new_title), &strip_newlines(old_title)),
        ));
    }
}

/// One field per property whose value changed, named after the property
pub fn append_property_changes(fields: &mut Vec<AttachmentField>, card_diff: &Diff) {
    for prop in card_diff.prop_diffs.iter().filter(|p| p.is_changed()) {
        let value = if prop.old_value.is_empty() {
            prop.new_value.clone()
        } else {
            replaced(&strip_newlines(&prop.new_value), &strip_newlines(&prop.old_value))
        };
        fields.push(AttachmentField::new(prop.name.as_str(), value));
    }
}

/// Added or removed file attachments among the card's children
pub fn append_attachment_changes(
    fields: &mut Vec<AttachmentField>,
    card_diff: &Diff,
    labels: &Labels,
) {
    for child in children_of(card_diff, BlockType::Attachment) {
        let value = match child.change_kind() {
            ChangeKind::Added => format!("{}**`{}`**", labels.attachment_added, child.new_title()),
            ChangeKind::Deleted => format!(
                "{}~~`{}`~~",
                labels.attachment_removed,
                strip_newlines(child.old_title())
            ),
            // a renamed attachment is reported by the content generator
            ChangeKind::Modified | ChangeKind::Skip => continue,
        };
        fields.push(AttachmentField::new(
            format!(
                "{}{}",
                make_authors_list(&child.authors, &labels.unknown_author),
                labels.attachment_changed_suffix
            ),
            value,
        ));
    }
}

/// Added or removed comments; not part of the default pipeline
pub fn append_comment_changes(fields: &mut Vec<AttachmentField>, card_diff: &Diff, labels: &Labels) {
    for child in children_of(card_diff, BlockType::Comment) {
        let value = match child.change_kind() {
            ChangeKind::Added => child.new_title().to_string(),
            ChangeKind::Deleted => format!("~~`{}`~~", strip_newlines(child.old_title())),
            ChangeKind::Modified | ChangeKind::Skip => continue,
        };
        fields.push(AttachmentField::new(
            format!(
                "{}{}",
                make_authors_list(&child.authors, &labels.unknown_author),
                labels.comment_suffix
            ),
            value,
        ));
    }
}

/// Markdown diffs of text-bearing children
///
/// Dividers and comments never produce a field. Untitled images and
/// attachments get a placeholder sentence. Anything mentioning a user is
/// dropped, since the mention notification already covers it.
pub fn append_content_changes(
    fields: &mut Vec<AttachmentField>,
    card_diff: &Diff,
    labels: &Labels,
    differ: &dyn TextDiffer,
) {
    let filter = MentionFilter;

    for child in &card_diff.diffs {
        let kind = child.change_kind();
        let verb = match kind {
            ChangeKind::Added => &labels.verb_added,
            ChangeKind::Deleted => &labels.verb_deleted,
            ChangeKind::Modified => &labels.verb_modified,
            ChangeKind::Skip => continue,
        };

        let mut new_text = child.new_title().to_string();
        let mut old_text = child.old_title().to_string();

        match child.block_type {
            BlockType::Divider | BlockType::Comment => continue,
            BlockType::Image | BlockType::Attachment => {
                let subject = if child.block_type == BlockType::Image {
                    &labels.image_subject
                } else {
                    &labels.attachment_subject
                };
                if new_text.is_empty() {
                    new_text = format!("{}{}.", subject, verb);
                }
                old_text.clear();
            }
            _ => {
                if kind != ChangeKind::Added {
                    if kind == ChangeKind::Deleted {
                        new_text.clear();
                    }
                    old_text = strip_newlines(&old_text);
                    new_text = strip_newlines(&new_text);
                }
                if new_text == old_text {
                    continue;
                }
            }
        }

        trace!(
            block_type = child.block_type.as_str(),
            op_label = verb.as_str(),
            old_text = old_text.as_str(),
            new_text = new_text.as_str(),
            "content change candidate"
        );

        let markdown = differ.diff_to_markdown(&old_text, &new_text);
        if markdown.is_empty() {
            continue;
        }

        if !filter.allows(&old_text, &new_text) {
            debug!(
                block_type = child.block_type.as_str(),
                "skipping content change with mention"
            );
            continue;
        }

        fields.push(AttachmentField::new(labels.content.as_str(), markdown));
    }
}

fn children_of(card_diff: &Diff, block_type: BlockType) -> impl Iterator<Item = &Diff> {
    card_diff
        .diffs
        .iter()
        .filter(move |child| child.block_type == block_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, PropDiff};
    use crate::textdiff::MarkdownTextDiffer;

    fn modified_card(old_title: &str, new_title: &str) -> Diff {
        let mut diff = Diff::new(BlockType::Card);
        diff.old_block = Some(Block::new("card", old_title));
        diff.new_block = Some(Block::new("card", new_title));
        diff
    }

    fn child(block_type: BlockType, old: Option<&str>, new: Option<&str>) -> Diff {
        let mut diff = Diff::new(block_type);
        diff.old_block = old.map(|t| Block::new("child", t));
        diff.new_block = new.map(|t| Block::new("child", t));
        diff
    }

    fn content_fields(card: &Diff) -> Vec<AttachmentField> {
        let mut fields = Vec::new();
        append_content_changes(&mut fields, card, &Labels::english(), &MarkdownTextDiffer);
        fields
    }

    #[test]
    fn test_title_change() {
        let mut fields = Vec::new();
        append_title_changes(&mut fields, &modified_card("T1", "T2"), &Labels::english());
        assert_eq!(fields, vec![AttachmentField::new("Title", "T2  ~~`T1`~~")]);

        fields.clear();
        append_title_changes(&mut fields, &modified_card("Same", "Same"), &Labels::english());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_property_changes() {
        let mut card = modified_card("T", "T");
        card.prop_diffs = vec![
            PropDiff::new("Status", "A", "B"),
            PropDiff::new("Owner", "", "alice"),
            PropDiff::new("Unchanged", "x", "x"),
        ];
        let mut fields = Vec::new();
        append_property_changes(&mut fields, &card);
        assert_eq!(
            fields,
            vec![
                AttachmentField::new("Status", "B  ~~`A`~~"),
                AttachmentField::new("Owner", "alice"),
            ]
        );
    }

    #[test]
    fn test_attachment_changes() {
        let mut card = modified_card("T", "T");
        let mut added = child(BlockType::Attachment, None, Some("spec.pdf"));
        added.authors.insert("alice");
        card.diffs = vec![
            added,
            child(BlockType::Attachment, Some("old.png"), None),
            child(BlockType::Attachment, Some("a"), Some("b")),
            child(BlockType::Text, None, Some("ignored")),
        ];

        let mut fields = Vec::new();
        append_attachment_changes(&mut fields, &card, &Labels::english());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].title, "@alice changed an attachment");
        assert_eq!(fields[0].value, "added: **`spec.pdf`**");
        assert_eq!(fields[1].title, "unknown user changed an attachment");
        assert_eq!(fields[1].value, "removed: ~~`old.png`~~");
    }

    #[test]
    fn test_renamed_attachment_is_content_only() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![child(BlockType::Attachment, Some("old.pdf"), Some("new.pdf"))];

        let mut fields = Vec::new();
        append_attachment_changes(&mut fields, &card, &Labels::english());
        assert!(fields.is_empty());

        let content = content_fields(&card);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].title, "Description");
        assert!(content[0].value.contains("new.pdf"));
        assert!(!content[0].value.contains("old.pdf"));
    }

    #[test]
    fn test_comment_changes() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![
            child(BlockType::Comment, None, Some("looks good")),
            child(BlockType::Comment, Some("old\nremark"), None),
        ];
        let mut fields = Vec::new();
        append_comment_changes(&mut fields, &card, &Labels::english());
        assert_eq!(fields[0].value, "looks good");
        assert_eq!(fields[1].value, "~~`old¶ remark`~~");
        assert!(fields[1].title.ends_with("'s comment"));
    }

    #[test]
    fn test_content_added_text() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![child(BlockType::Text, None, Some("hello"))];
        let fields = content_fields(&card);
        assert_eq!(fields, vec![AttachmentField::new("Description", "**`hello`**")]);
    }

    #[test]
    fn test_content_unchanged_text_skipped() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![child(BlockType::Text, Some("same text"), Some("same text"))];
        assert!(content_fields(&card).is_empty());
    }

    #[test]
    fn test_content_untitled_image_placeholder() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![child(BlockType::Image, None, Some(""))];
        let fields = content_fields(&card);
        assert_eq!(fields.len(), 1);
        assert!(fields[0].value.contains("image added."));
    }

    #[test]
    fn test_content_divider_and_comment_never_emit() {
        let mut card = modified_card("T", "T");
        for block_type in [BlockType::Divider, BlockType::Comment] {
            card.diffs = vec![
                child(block_type, None, Some("x")),
                child(block_type, Some("x"), None),
                child(block_type, Some("x"), Some("y")),
            ];
            assert!(content_fields(&card).is_empty());
        }
    }

    #[test]
    fn test_content_mention_suppressed() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![
            child(BlockType::Text, Some("plain"), Some("ping @bob")),
            child(BlockType::Text, Some("cc @carol"), None),
        ];
        assert!(content_fields(&card).is_empty());
    }

    #[test]
    fn test_content_degenerate_child_skipped() {
        let mut card = modified_card("T", "T");
        card.diffs = vec![child(BlockType::Image, None, None)];
        assert!(content_fields(&card).is_empty());
    }
}
