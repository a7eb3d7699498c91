//! Text-diff capability: two strings in, a markdown summary out.

use difference::{Changeset, Difference};

/// Renders the difference between two texts as markdown
///
/// An empty result means "no meaningful difference" and suppresses the
/// field that would have shown it.
pub trait TextDiffer: Send + Sync {
    fn diff_to_markdown(&self, old_text: &str, new_text: &str) -> String;
}

/// Word-level differ: removed words struck through, inserted words bold
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownTextDiffer;

impl TextDiffer for MarkdownTextDiffer {
    fn diff_to_markdown(&self, old_text: &str, new_text: &str) -> String {
        let old_text = old_text.trim();
        let new_text = new_text.trim();
        if old_text == new_text {
            return String::new();
        }

        let Changeset { diffs, .. } = Changeset::new(old_text, new_text, " ");

        let mut out = String::new();
        for diff in &diffs {
            match diff {
                Difference::Same(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(text);
                    }
                }
                Difference::Add(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(&format!(" **`{}`** ", text));
                    }
                }
                Difference::Rem(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(&format!(" ~~`{}`~~ ", text));
                    }
                }
            }
        }

        out.trim().to_string()
    }
}
