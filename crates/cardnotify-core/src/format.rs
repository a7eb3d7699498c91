//! Text transforms shared by templates and field generators.

use crate::model::AuthorSet;

/// Glyph that stands in for a line break in single-line renderings
pub const NEWLINE_GLYPH: &str = "¶ ";

/// Collapse line breaks into a visible glyph and trim the result
pub fn strip_newlines(text: &str) -> String {
    text.replace('\n', NEWLINE_GLYPH).trim().to_string()
}

/// Render `@id1, @id2, ...` in set order, or `empty` for an empty set
pub fn make_authors_list(authors: &AuthorSet, empty: &str) -> String {
    if authors.is_empty() {
        return empty.to_string();
    }
    authors
        .iter()
        .map(|id| format!("@{}", id.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `new  ~~`old`~~`: the new value followed by the struck-through old one
pub fn replaced(new_value: &str, old_value: &str) -> String {
    format!("{}  ~~`{}`~~", new_value, old_value)
}
