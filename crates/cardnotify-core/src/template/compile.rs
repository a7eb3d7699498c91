//! Template compilation and execution.
//!
//! Source text is plain markdown with `{{ ... }}` actions. An action is a
//! pipeline: a value (a field path rooted at the diff, or a quoted string)
//! optionally piped through helpers, the piped value always arriving as the
//! helper's last argument:
//!
//! ```text
//! {{.Authors | printAuthors "someone"}} added [{{.Card.Title}}]({{. | makeLink}})
//! ```
//!
//! Field paths and helper names are resolved at compile time; whether a
//! path actually reaches a value is only known once a diff is supplied.

use std::borrow::Cow;
use std::fmt;

use crate::errors::{NotifyError, Result};
use crate::links::LinkBuilder;
use crate::model::{AuthorSet, Block, Board, Diff};

use super::helpers::Helper;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Immutable, ready-to-execute template
///
/// Safe to share across threads: execution only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    key: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Action(Pipeline),
}

#[derive(Debug, Clone, PartialEq)]
struct Pipeline {
    head: Operand,
    stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Path(FieldPath),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Stage {
    helper: Helper,
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldPath {
    Dot,
    BlockType,
    Authors,
    Board(BoardField),
    Block(BlockSlot, BlockField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockSlot {
    Card,
    NewBlock,
    OldBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockField {
    Id,
    ParentId,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardField {
    Id,
    TeamId,
    Title,
    Description,
}

impl BlockSlot {
    fn name(self) -> &'static str {
        match self {
            BlockSlot::Card => "Card",
            BlockSlot::NewBlock => "NewBlock",
            BlockSlot::OldBlock => "OldBlock",
        }
    }

    fn resolve(self, diff: &Diff) -> Option<&Block> {
        match self {
            BlockSlot::Card => diff.card_block(),
            BlockSlot::NewBlock => diff.new_block.as_ref(),
            BlockSlot::OldBlock => diff.old_block.as_ref(),
        }
    }
}

impl BlockField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "ID" | "Id" => Some(BlockField::Id),
            "ParentID" | "ParentId" => Some(BlockField::ParentId),
            "Title" => Some(BlockField::Title),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            BlockField::Id => "ID",
            BlockField::ParentId => "ParentID",
            BlockField::Title => "Title",
        }
    }

    fn get(self, block: &Block) -> &str {
        match self {
            BlockField::Id => &block.id,
            BlockField::ParentId => &block.parent_id,
            BlockField::Title => &block.title,
        }
    }
}

impl BoardField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "ID" | "Id" => Some(BoardField::Id),
            "TeamID" | "TeamId" => Some(BoardField::TeamId),
            "Title" => Some(BoardField::Title),
            "Description" => Some(BoardField::Description),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            BoardField::Id => "ID",
            BoardField::TeamId => "TeamID",
            BoardField::Title => "Title",
            BoardField::Description => "Description",
        }
    }

    fn get(self, board: &Board) -> &str {
        match self {
            BoardField::Id => &board.id,
            BoardField::TeamId => &board.team_id,
            BoardField::Title => &board.title,
            BoardField::Description => &board.description,
        }
    }
}

impl FieldPath {
    fn parse(word: &str) -> std::result::Result<Self, String> {
        if word == "." {
            return Ok(FieldPath::Dot);
        }
        let parts: Vec<&str> = word
            .strip_prefix('.')
            .ok_or_else(|| format!("unexpected \"{}\" in operand", word))?
            .split('.')
            .collect();

        let unknown = || format!("can't evaluate field path {} in type Diff", word);
        let not_printable = || format!("{} is a record; select one of its fields", word);
        match parts.as_slice() {
            ["BlockType"] => Ok(FieldPath::BlockType),
            ["Authors"] => Ok(FieldPath::Authors),
            ["Board"] => Err(not_printable()),
            ["Board", field] => BoardField::parse(field)
                .map(FieldPath::Board)
                .ok_or_else(unknown),
            [slot] | [slot, _] => {
                let slot = match *slot {
                    "Card" => BlockSlot::Card,
                    "NewBlock" => BlockSlot::NewBlock,
                    "OldBlock" => BlockSlot::OldBlock,
                    _ => return Err(unknown()),
                };
                let field = parts.get(1).ok_or_else(not_printable)?;
                BlockField::parse(field)
                    .map(|f| FieldPath::Block(slot, f))
                    .ok_or_else(unknown)
            }
            _ => Err(unknown()),
        }
    }

    fn eval<'a>(self, diff: &'a Diff) -> std::result::Result<Value<'a>, String> {
        match self {
            FieldPath::Dot => Ok(Value::Diff(diff)),
            FieldPath::BlockType => Ok(Value::Text(Cow::Borrowed(diff.block_type.as_str()))),
            FieldPath::Authors => Ok(Value::Authors(&diff.authors)),
            FieldPath::Board(field) => {
                let board = diff
                    .board
                    .as_ref()
                    .ok_or_else(|| format!("can't evaluate {}: Board is absent", self))?;
                Ok(Value::Text(Cow::Borrowed(field.get(board))))
            }
            FieldPath::Block(slot, field) => {
                let block = slot
                    .resolve(diff)
                    .ok_or_else(|| format!("can't evaluate {}: {} is absent", self, slot.name()))?;
                Ok(Value::Text(Cow::Borrowed(field.get(block))))
            }
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Dot => f.write_str("."),
            FieldPath::BlockType => f.write_str(".BlockType"),
            FieldPath::Authors => f.write_str(".Authors"),
            FieldPath::Board(field) => write!(f, ".Board.{}", field.name()),
            FieldPath::Block(slot, field) => write!(f, ".{}.{}", slot.name(), field.name()),
        }
    }
}

/// Runtime value flowing through a pipeline
#[derive(Debug, Clone)]
pub(crate) enum Value<'a> {
    Diff(&'a Diff),
    Authors(&'a AuthorSet),
    Text(Cow<'a, str>),
}

impl<'a> Value<'a> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Diff(_) => "Diff",
            Value::Authors(_) => "Authors",
            Value::Text(_) => "string",
        }
    }

    fn into_text(self) -> std::result::Result<Cow<'a, str>, String> {
        match self {
            Value::Text(text) => Ok(text),
            other => Err(format!("cannot print value of type {}", other.kind())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Str(String),
    Pipe,
}

/// Compile `source` into a template identified by `key`
///
/// # Errors
///
/// Returns `TemplateCompile` for unterminated or empty actions, unknown
/// field paths or helpers, malformed string literals and wrong helper
/// argument counts.
pub fn compile(key: &str, source: &str) -> Result<CompiledTemplate> {
    let compile_err = |reason: String| NotifyError::TemplateCompile {
        key: key.to_string(),
        reason,
    };

    let mut segments = Vec::new();
    let mut rest = source;
    let mut offset = 0usize;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        let after_open = &rest[start + OPEN.len()..];
        let end = find_close(after_open).ok_or_else(|| {
            compile_err(format!("unclosed action starting at byte {}", offset + start))
        })?;
        let pipeline = parse_pipeline(&after_open[..end]).map_err(compile_err)?;
        segments.push(Segment::Action(pipeline));

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }

    Ok(CompiledTemplate {
        key: key.to_string(),
        segments,
    })
}

/// Position of the closing delimiter, ignoring any inside string literals
fn find_close(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'}' if !in_string && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn tokenize(action: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = action.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '|' {
            chars.next();
            tokens.push(Token::Pipe);
        } else if c == '"' {
            chars.next();
            let mut literal = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => literal.push('\n'),
                        Some('t') => literal.push('\t'),
                        Some(other) => literal.push(other),
                        None => break,
                    },
                    other => literal.push(other),
                }
            }
            if !closed {
                return Err("unterminated quoted string".to_string());
            }
            tokens.push(Token::Str(literal));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '|' || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Ok(tokens)
}

fn parse_pipeline(action: &str) -> std::result::Result<Pipeline, String> {
    let tokens = tokenize(action)?;
    if tokens.is_empty() {
        return Err("missing value for command".to_string());
    }

    let mut commands = tokens.split(|t| *t == Token::Pipe);

    let head = match commands.next().unwrap_or_default() {
        [Token::Word(word)] if word.starts_with('.') => Operand::Path(FieldPath::parse(word)?),
        [Token::Str(literal)] => Operand::Literal(literal.clone()),
        [] => return Err("missing value for command".to_string()),
        [Token::Word(word), ..] if Helper::from_name(word).is_some() => {
            return Err(format!(
                "helper \"{}\" must receive its input through a pipe",
                word
            ))
        }
        [Token::Word(word), ..] => return Err(format!("function \"{}\" not defined", word)),
        _ => return Err("pipeline must start with a field or a string".to_string()),
    };

    let mut stages = Vec::new();
    for command in commands {
        let (name, arg_tokens) = match command {
            [] => return Err("missing command after '|'".to_string()),
            [Token::Word(name), rest @ ..] => (name, rest),
            _ => return Err("expected helper name after '|'".to_string()),
        };
        let helper =
            Helper::from_name(name).ok_or_else(|| format!("function \"{}\" not defined", name))?;

        let mut args = Vec::with_capacity(arg_tokens.len());
        for token in arg_tokens {
            match token {
                Token::Str(literal) => args.push(literal.clone()),
                _ => return Err(format!("{} only accepts quoted string arguments", name)),
            }
        }
        if args.len() != helper.literal_args() {
            return Err(format!(
                "wrong number of args for {}: want {} got {}",
                name,
                helper.literal_args(),
                args.len()
            ));
        }
        stages.push(Stage { helper, args });
    }

    Ok(Pipeline { head, stages })
}

impl CompiledTemplate {
    /// Cache key (`name&language`) this template was compiled under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Render against `diff`, resolving link helpers through `links`
    ///
    /// # Errors
    ///
    /// Returns `TemplateExecution` when a path crosses an absent block or
    /// board, or a helper receives a value of the wrong type.
    pub fn execute(&self, diff: &Diff, links: &dyn LinkBuilder) -> Result<String> {
        let mut out = String::new();
        self.execute_into(&mut out, diff, links)?;
        Ok(out)
    }

    /// Render into an existing buffer; on error the buffer holds a partial render
    ///
    /// # Errors
    ///
    /// See [`CompiledTemplate::execute`].
    pub fn execute_into(&self, out: &mut String, diff: &Diff, links: &dyn LinkBuilder) -> Result<()> {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Action(pipeline) => {
                    let text = self
                        .run(pipeline, diff, links)
                        .map_err(|reason| NotifyError::TemplateExecution {
                            key: self.key.clone(),
                            reason,
                        })?;
                    out.push_str(&text);
                }
            }
        }
        Ok(())
    }

    fn run<'a>(
        &self,
        pipeline: &Pipeline,
        diff: &'a Diff,
        links: &dyn LinkBuilder,
    ) -> std::result::Result<Cow<'a, str>, String> {
        let mut value = match &pipeline.head {
            Operand::Path(path) => path.eval(diff)?,
            Operand::Literal(literal) => Value::Text(Cow::Owned(literal.clone())),
        };
        for stage in &pipeline.stages {
            value = stage.helper.apply(&stage.args, value, links)?;
        }
        value.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::PlainLinkBuilder;
    use crate::model::BlockType;

    fn card_diff() -> Diff {
        let card = Block::new("c1", "Fix bug");
        let mut diff = Diff::new(BlockType::Card);
        diff.card = Some(card.clone());
        diff.new_block = Some(card);
        diff.board = Some(Board::new("b1", "Sprint"));
        diff.authors = ["alice"].into_iter().collect();
        diff
    }

    fn render(source: &str, diff: &Diff) -> Result<String> {
        compile("t&en", source)?.execute(diff, &PlainLinkBuilder)
    }

    #[test]
    fn test_literal_only() {
        assert_eq!(render("plain text\n", &card_diff()).unwrap(), "plain text\n");
    }

    #[test]
    fn test_field_paths_and_helpers() {
        let out = render(
            "{{.Authors | printAuthors \"nobody\"}} added card [{{.Card.Title}}]({{. | makeLink}}) on {{. | makeBoardLink}}",
            &card_diff(),
        )
        .unwrap();
        assert_eq!(out, "@alice added card [Fix bug](`Fix bug`) on `Sprint`");
    }

    #[test]
    fn test_string_literal_head_and_strip() {
        let out = render("{{\"a\\nb\" | stripNewlines}}", &card_diff()).unwrap();
        assert_eq!(out, "a¶ b");
    }

    #[test]
    fn test_close_delimiter_inside_string_literal() {
        let out = render("{{.Authors | printAuthors \"}}\"}}", &Diff::new(BlockType::Card)).unwrap();
        assert_eq!(out, "}}");
    }

    #[test]
    fn test_compile_errors() {
        let cases = [
            "{{.Card.Title",
            "{{}}",
            "{{.Card.Colour}}",
            "{{.Nope}}",
            "{{. | shout}}",
            "{{.Authors | printAuthors}}",
            "{{.Authors | printAuthors \"x}}",
            "{{printAuthors \"x\" .Authors}}",
            "{{. | }}",
            "{{.Card}}",
            "{{.NewBlock | stripNewlines}}",
            "{{.Board}}",
        ];
        for source in cases {
            match compile("bad&en", source) {
                Err(NotifyError::TemplateCompile { key, .. }) => assert_eq!(key, "bad&en"),
                other => panic!("{:?} should not compile: {:?}", source, other),
            }
        }
    }

    #[test]
    fn test_absent_block_is_execution_error() {
        let mut diff = card_diff();
        diff.card = None;
        diff.new_block = None;
        match render("[{{.Card.Title}}]", &diff) {
            Err(NotifyError::TemplateExecution { reason, .. }) => {
                assert!(reason.contains(".Card.Title"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_is_execution_error() {
        assert!(matches!(
            render("{{.Card.Title | printAuthors \"x\"}}", &card_diff()),
            Err(NotifyError::TemplateExecution { .. })
        ));
        assert!(matches!(
            render("{{.Authors}}", &card_diff()),
            Err(NotifyError::TemplateExecution { .. })
        ));
    }
}
