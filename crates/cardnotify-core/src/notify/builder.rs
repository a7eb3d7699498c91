//! Card diff → attachment.

use tracing::debug;

use crate::config::ConvertOptions;
use crate::errors::{NotifyError, Result};
use crate::model::{Attachment, ChangeKind, Diff};
use crate::template::TemplateCache;

use super::fields::{
    append_attachment_changes, append_comment_changes, append_content_changes,
    append_property_changes, append_title_changes,
};

pub const ADD_CARD_NOTIFY: &str = "AddCardNotify";
pub const MODIFY_CARD_NOTIFY: &str = "ModifyCardNotify";
pub const DELETE_CARD_NOTIFY: &str = "DeleteCardNotify";

/// Build the attachment for one card diff
///
/// Added and deleted cards always yield an attachment with no fields. A
/// modified card yields one only when some generator produced a field.
/// A diff with neither side present yields nothing.
///
/// # Errors
///
/// Returns the template error when the pretext cannot be rendered. A
/// failure on a modified card is wrapped with the card id.
pub fn card_diff_to_attachment(
    cache: &TemplateCache,
    card_diff: &Diff,
    opts: &ConvertOptions,
) -> Result<Option<Attachment>> {
    let links = opts.links.as_ref();
    let card = card_diff.card_block();
    let title_link = || links.card_link(card, card_diff.board.as_ref(), card);

    match card_diff.change_kind() {
        ChangeKind::Skip => Ok(None),
        ChangeKind::Added => {
            let pretext = cache.render(
                ADD_CARD_NOTIFY,
                &opts.language,
                &opts.templates.add_card,
                card_diff,
                links,
            )?;
            Ok(Some(Attachment::with_pretext(pretext, title_link())))
        }
        ChangeKind::Deleted => {
            let pretext = cache.render(
                DELETE_CARD_NOTIFY,
                &opts.language,
                &opts.templates.delete_card,
                card_diff,
                links,
            )?;
            Ok(Some(Attachment::with_pretext(pretext, title_link())))
        }
        ChangeKind::Modified => {
            debug!(
                board_id = card_diff.board_id(),
                card_id = card_diff.card_id(),
                new_block_id = card_diff.new_block.as_ref().map_or("", |b| b.id.as_str()),
                old_block_id = card_diff.old_block.as_ref().map_or("", |b| b.id.as_str()),
                child_diffs = card_diff.diffs.len(),
                "modified card"
            );

            let pretext = cache
                .render(
                    MODIFY_CARD_NOTIFY,
                    &opts.language,
                    &opts.templates.modify_card,
                    card_diff,
                    links,
                )
                .map_err(|err| NotifyError::CardNotification {
                    card_id: card_diff
                        .new_block
                        .as_ref()
                        .map_or_else(|| card_diff.card_id().to_string(), |b| b.id.clone()),
                    source: Box::new(err),
                })?;

            let mut attachment = Attachment::with_pretext(pretext, title_link());
            let fields = &mut attachment.fields;
            let labels = &opts.labels;

            append_title_changes(fields, card_diff, labels);
            append_property_changes(fields, card_diff);
            append_attachment_changes(fields, card_diff, labels);
            append_content_changes(fields, card_diff, labels, opts.differ.as_ref());
            if opts.include_comments {
                append_comment_changes(fields, card_diff, labels);
            }

            if attachment.fields.is_empty() {
                return Ok(None);
            }
            Ok(Some(attachment))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Labels, TemplateSources};
    use crate::model::{Block, BlockType, Board, PropDiff};

    fn english() -> ConvertOptions {
        ConvertOptions::new()
            .with_language("en")
            .with_labels(Labels::english())
            .with_templates(TemplateSources::english())
    }

    fn card_diff(old: Option<&str>, new: Option<&str>) -> Diff {
        let mut diff = Diff::new(BlockType::Card);
        diff.board = Some(Board::new("board-1", "Team"));
        diff.old_block = old.map(|t| Block::new("card-1", t));
        diff.new_block = new.map(|t| Block::new("card-1", t));
        diff.card = diff.new_block.clone().or_else(|| diff.old_block.clone());
        diff.authors.insert("alice");
        diff
    }

    #[test]
    fn test_added_card() {
        let cache = TemplateCache::new();
        let attachment = card_diff_to_attachment(&cache, &card_diff(None, Some("Fix bug")), &english())
            .unwrap()
            .unwrap();
        assert_eq!(attachment.pretext, "@alice added card [Fix bug](`Fix bug`)\n");
        assert_eq!(attachment.fallback, attachment.pretext);
        assert_eq!(attachment.title_link, "`Fix bug`");
        assert!(attachment.fields.is_empty());
    }

    #[test]
    fn test_deleted_card_via_marker() {
        let cache = TemplateCache::new();
        let mut diff = card_diff(Some("Old"), Some("Old"));
        diff.new_block = diff.new_block.map(|b| b.deleted_at(1_700_000_000_000));
        let attachment = card_diff_to_attachment(&cache, &diff, &english())
            .unwrap()
            .unwrap();
        assert!(attachment.pretext.contains("deleted card"));
        assert!(attachment.fields.is_empty());
    }

    #[test]
    fn test_modified_without_changes_is_none() {
        let cache = TemplateCache::new();
        let result = card_diff_to_attachment(&cache, &card_diff(Some("T"), Some("T")), &english());
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_modified_property() {
        let cache = TemplateCache::new();
        let mut diff = card_diff(Some("T"), Some("T"));
        diff.prop_diffs.push(PropDiff::new("Status", "A", "B"));
        let attachment = card_diff_to_attachment(&cache, &diff, &english())
            .unwrap()
            .unwrap();
        assert!(attachment.pretext.starts_with("###### @alice modified card [T]"));
        assert_eq!(attachment.fields.len(), 1);
        assert_eq!(attachment.fields[0].value, "B  ~~`A`~~");
    }

    #[test]
    fn test_skip_when_both_sides_missing() {
        let cache = TemplateCache::new();
        assert_eq!(
            card_diff_to_attachment(&cache, &card_diff(None, None), &english()).unwrap(),
            None
        );
        assert_eq!(cache.compile_count(), 0);
    }

    #[test]
    fn test_comments_only_when_enabled() {
        let cache = TemplateCache::new();
        let mut diff = card_diff(Some("T"), Some("T"));
        let mut comment = Diff::new(BlockType::Comment);
        comment.new_block = Some(Block::new("c", "nice"));
        diff.diffs.push(comment);

        assert_eq!(card_diff_to_attachment(&cache, &diff, &english()).unwrap(), None);

        let opts = english().with_comment_changes(true);
        let attachment = card_diff_to_attachment(&cache, &diff, &opts).unwrap().unwrap();
        assert_eq!(attachment.fields[0].value, "nice");
    }

    #[test]
    fn test_modify_template_error_names_card() {
        let cache = TemplateCache::new();
        let mut templates = TemplateSources::english();
        templates.modify_card = "{{.Nope}}".to_string();
        let opts = english().with_language("broken").with_templates(templates);
        let err = card_diff_to_attachment(&cache, &card_diff(Some("A"), Some("B")), &opts)
            .unwrap_err();
        match err {
            NotifyError::CardNotification { card_id, source } => {
                assert_eq!(card_id, "card-1");
                assert!(matches!(*source, NotifyError::TemplateCompile { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
