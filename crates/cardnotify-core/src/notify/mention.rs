//! Mention detection and the mention-delivery message text.
//!
//! Content that mentions someone is delivered through a dedicated mention
//! notification, so the change summary drops it rather than repeating it.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::BlockType;

const MENTION_PATTERN: &str = r"@[A-Za-z0-9_\-]+";

fn mention_regex() -> Option<&'static Regex> {
    static MENTION: OnceLock<Option<Regex>> = OnceLock::new();
    MENTION
        .get_or_init(|| Regex::new(MENTION_PATTERN).ok())
        .as_ref()
}

/// True if `text` contains `@` followed by at least one name character
pub fn contains_mention(text: &str) -> bool {
    mention_regex().is_some_and(|re| re.is_match(text))
}

/// Suppression rule for content fields
#[derive(Debug, Default, Clone, Copy)]
pub struct MentionFilter;

impl MentionFilter {
    /// Whether a content field built from `old_text` and `new_text` may be emitted
    pub fn allows(&self, old_text: &str, new_text: &str) -> bool {
        !contains_mention(old_text) && !contains_mention(new_text)
    }
}

/// Inputs for one mention-delivery message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionMessage<'a> {
    pub author: &'a str,
    pub mentioned_user: &'a str,
    /// Text surrounding the mention, quoted in the message
    pub extract: &'a str,
    pub card_title: &'a str,
    pub card_link: &'a str,
    pub board_title: &'a str,
    pub board_link: &'a str,
    /// Type of the block holding the mention; comments get their own wording
    pub block_type: BlockType,
}

/// Render the message sent to a mentioned user
pub fn format_mention_message(message: &MentionMessage<'_>) -> String {
    let m = message;
    if m.block_type == BlockType::Comment {
        format!(
            "@{}님이 @{}님을 카드 [{}]({}) 댓글에서 언급했습니다 (보드: [{}]({}))\n> {}",
            m.author, m.mentioned_user, m.card_title, m.card_link, m.board_title, m.board_link, m.extract
        )
    } else {
        format!(
            "@{}님이 @{}님을 카드 [{}]({})에서 언급했습니다 (보드: [{}]({}))\n> {}",
            m.author, m.mentioned_user, m.card_title, m.card_link, m.board_title, m.board_link, m.extract
        )
    }
}
