//! Named helpers bound into every template namespace.

use std::borrow::Cow;

use crate::format::{make_authors_list, strip_newlines};
use crate::links::LinkBuilder;

use super::compile::Value;

/// Helper callable from a template pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    /// `{{. | makeLink}}`: link to the diff's block on its card
    MakeLink,
    /// `{{. | makeBoardLink}}`: link to the diff's board
    MakeBoardLink,
    /// `{{.Authors | printAuthors "fallback"}}`
    PrintAuthors,
    /// `{{.Card.Title | stripNewlines}}`
    StripNewlines,
}

impl Helper {
    pub const ALL: [Helper; 4] = [
        Helper::MakeLink,
        Helper::MakeBoardLink,
        Helper::PrintAuthors,
        Helper::StripNewlines,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Helper::MakeLink => "makeLink",
            Helper::MakeBoardLink => "makeBoardLink",
            Helper::PrintAuthors => "printAuthors",
            Helper::StripNewlines => "stripNewlines",
        }
    }

    /// Number of quoted arguments preceding the piped value
    pub fn literal_args(&self) -> usize {
        match self {
            Helper::PrintAuthors => 1,
            Helper::MakeLink | Helper::MakeBoardLink | Helper::StripNewlines => 0,
        }
    }

    pub(crate) fn apply<'a>(
        &self,
        args: &[String],
        input: Value<'a>,
        links: &dyn LinkBuilder,
    ) -> Result<Value<'a>, String> {
        let mismatch = |input: &Value<'_>, want: &str| {
            format!(
                "wrong type for value; expected {} for {}, got {}",
                want,
                self.name(),
                input.kind()
            )
        };

        match (self, &input) {
            (Helper::MakeLink, Value::Diff(diff)) => {
                // a deleted card has no new side; link to what it was
                let block = diff.new_block.as_ref().or(diff.old_block.as_ref());
                Ok(Value::Text(Cow::Owned(links.card_link(
                    block,
                    diff.board.as_ref(),
                    diff.card_block(),
                ))))
            }
            (Helper::MakeBoardLink, Value::Diff(diff)) => Ok(Value::Text(Cow::Owned(
                links.board_link(diff.board.as_ref()),
            ))),
            (Helper::PrintAuthors, Value::Authors(authors)) => {
                let empty = args.first().map_or("", String::as_str);
                Ok(Value::Text(Cow::Owned(make_authors_list(authors, empty))))
            }
            (Helper::StripNewlines, Value::Text(text)) => {
                Ok(Value::Text(Cow::Owned(strip_newlines(text))))
            }
            (Helper::MakeLink | Helper::MakeBoardLink, _) => Err(mismatch(&input, "Diff")),
            (Helper::PrintAuthors, _) => Err(mismatch(&input, "Authors")),
            (Helper::StripNewlines, _) => Err(mismatch(&input, "string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for helper in Helper::ALL {
            assert_eq!(Helper::from_name(helper.name()), Some(helper));
        }
        assert_eq!(Helper::from_name("getBoardDescription"), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(Helper::PrintAuthors.literal_args(), 1);
        assert_eq!(Helper::MakeLink.literal_args(), 0);
    }
}
