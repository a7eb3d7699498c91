//! Engine configuration: language, user-facing labels, template sources.
//!
//! Defaults reproduce the deployed Korean wording. A TOML document may pick
//! another preset with `language` and override any label or template.
//!
//! ```toml
//! language = "en"
//! server_root = "https://chat.example.com/boards"
//!
//! [labels]
//! title = "Title"
//!
//! [templates]
//! add_card = "{{.Authors | printAuthors \"someone\"}} created [{{.Card.Title}}]({{. | makeLink}})"
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{NotifyError, Result};
use crate::links::{LinkBuilder, PlainLinkBuilder, ServerLinkBuilder};
use crate::textdiff::{MarkdownTextDiffer, TextDiffer};

/// Korean template for a newly added card
pub const DEF_ADD_CARD_NOTIFY_KO: &str = "{{.Authors | printAuthors \"알 수 없는 사용자\" }}님이 카드 [{{.Card.Title}}]({{. | makeLink}})를 추가했습니다.\n";
/// Korean template for a modified card
pub const DEF_MODIFY_CARD_NOTIFY_KO: &str = "###### {{.Authors | printAuthors \"알 수 없는 사용자\" }}님이 보드 {{. | makeBoardLink}}에서 카드 [{{.Card.Title}}]({{. | makeLink}})를 수정했습니다.\n";
/// Korean template for a deleted card
pub const DEF_DELETE_CARD_NOTIFY_KO: &str = "{{.Authors | printAuthors \"알 수 없는 사용자\" }}님이 카드 [{{.Card.Title}}]({{. | makeLink}})를 삭제했습니다.\n";

pub const DEF_ADD_CARD_NOTIFY_EN: &str =
    "{{.Authors | printAuthors \"unknown user\"}} added card [{{.Card.Title}}]({{. | makeLink}})\n";
pub const DEF_MODIFY_CARD_NOTIFY_EN: &str = "###### {{.Authors | printAuthors \"unknown user\"}} modified card [{{.Card.Title}}]({{. | makeLink}}) on board {{. | makeBoardLink}}\n";
pub const DEF_DELETE_CARD_NOTIFY_EN: &str =
    "{{.Authors | printAuthors \"unknown user\"}} deleted card [{{.Card.Title}}]({{. | makeLink}})\n";

pub const DEFAULT_LANGUAGE: &str = "ko";

/// Every user-facing string the field generators emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Placeholder when a change has no known author
    pub unknown_author: String,
    /// Field title for card title changes
    pub title: String,
    /// Field title for description/content changes
    pub content: String,
    /// Appended to the author list on attachment fields
    pub attachment_changed_suffix: String,
    /// Appended to the author list on comment fields
    pub comment_suffix: String,
    pub attachment_added: String,
    pub attachment_removed: String,
    /// Subject of the placeholder sentence for an untitled image
    pub image_subject: String,
    /// Subject of the placeholder sentence for an untitled attachment
    pub attachment_subject: String,
    pub verb_added: String,
    pub verb_deleted: String,
    pub verb_modified: String,
}

impl Labels {
    pub fn korean() -> Self {
        Self {
            unknown_author: "알 수 없는 사용자".to_string(),
            title: "제목".to_string(),
            content: "설명".to_string(),
            attachment_changed_suffix: "님이 변경함".to_string(),
            comment_suffix: "님의 댓글".to_string(),
            attachment_added: "첨부 파일 추가: ".to_string(),
            attachment_removed: "첨부 파일 삭제: ".to_string(),
            image_subject: "이미지가 ".to_string(),
            attachment_subject: "첨부 파일이 ".to_string(),
            verb_added: "추가됨".to_string(),
            verb_deleted: "삭제됨".to_string(),
            verb_modified: "수정됨".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            unknown_author: "unknown user".to_string(),
            title: "Title".to_string(),
            content: "Description".to_string(),
            attachment_changed_suffix: " changed an attachment".to_string(),
            comment_suffix: "'s comment".to_string(),
            attachment_added: "added: ".to_string(),
            attachment_removed: "removed: ".to_string(),
            image_subject: "image ".to_string(),
            attachment_subject: "attachment ".to_string(),
            verb_added: "added".to_string(),
            verb_deleted: "deleted".to_string(),
            verb_modified: "modified".to_string(),
        }
    }

    /// Preset for a language key; anything but English gets Korean
    pub fn for_language(language: &str) -> Self {
        if language.eq_ignore_ascii_case("en") {
            Self::english()
        } else {
            Self::korean()
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::korean()
    }
}

/// Default template sources for the three card states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSources {
    pub add_card: String,
    pub modify_card: String,
    pub delete_card: String,
}

impl TemplateSources {
    pub fn korean() -> Self {
        Self {
            add_card: DEF_ADD_CARD_NOTIFY_KO.to_string(),
            modify_card: DEF_MODIFY_CARD_NOTIFY_KO.to_string(),
            delete_card: DEF_DELETE_CARD_NOTIFY_KO.to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            add_card: DEF_ADD_CARD_NOTIFY_EN.to_string(),
            modify_card: DEF_MODIFY_CARD_NOTIFY_EN.to_string(),
            delete_card: DEF_DELETE_CARD_NOTIFY_EN.to_string(),
        }
    }

    pub fn for_language(language: &str) -> Self {
        if language.eq_ignore_ascii_case("en") {
            Self::english()
        } else {
            Self::korean()
        }
    }
}

impl Default for TemplateSources {
    fn default() -> Self {
        Self::korean()
    }
}

/// Resolved engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Template cache partition key and label preset
    pub language: String,
    /// Root URL for card links; plain backticked titles when absent
    pub server_root: Option<String>,
    /// Render comment add/delete fields as well
    pub include_comments: bool,
    pub labels: Labels,
    pub templates: TemplateSources,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::for_language(DEFAULT_LANGUAGE)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    language: Option<String>,
    server_root: Option<String>,
    #[serde(default)]
    include_comments: bool,
    #[serde(default)]
    labels: RawLabels,
    #[serde(default)]
    templates: RawTemplates,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLabels {
    unknown_author: Option<String>,
    title: Option<String>,
    content: Option<String>,
    attachment_changed_suffix: Option<String>,
    comment_suffix: Option<String>,
    attachment_added: Option<String>,
    attachment_removed: Option<String>,
    image_subject: Option<String>,
    attachment_subject: Option<String>,
    verb_added: Option<String>,
    verb_deleted: Option<String>,
    verb_modified: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplates {
    add_card: Option<String>,
    modify_card: Option<String>,
    delete_card: Option<String>,
}

fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl NotifyConfig {
    /// Preset labels and templates for `language`
    pub fn for_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
            server_root: None,
            include_comments: false,
            labels: Labels::for_language(language),
            templates: TemplateSources::for_language(language),
        }
    }

    /// Parse a TOML document, overlaying it on the preset its `language` selects
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown keys or an empty
    /// language.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(source)?;

        let language = raw
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        if language.trim().is_empty() {
            return Err(NotifyError::InvalidConfig {
                reason: "language cannot be empty".to_string(),
            });
        }

        let mut config = Self::for_language(&language);
        config.server_root = raw.server_root.filter(|root| !root.trim().is_empty());
        config.include_comments = raw.include_comments;

        let labels = &mut config.labels;
        let l = raw.labels;
        overlay(&mut labels.unknown_author, l.unknown_author);
        overlay(&mut labels.title, l.title);
        overlay(&mut labels.content, l.content);
        overlay(&mut labels.attachment_changed_suffix, l.attachment_changed_suffix);
        overlay(&mut labels.comment_suffix, l.comment_suffix);
        overlay(&mut labels.attachment_added, l.attachment_added);
        overlay(&mut labels.attachment_removed, l.attachment_removed);
        overlay(&mut labels.image_subject, l.image_subject);
        overlay(&mut labels.attachment_subject, l.attachment_subject);
        overlay(&mut labels.verb_added, l.verb_added);
        overlay(&mut labels.verb_deleted, l.verb_deleted);
        overlay(&mut labels.verb_modified, l.verb_modified);

        let t = raw.templates;
        overlay(&mut config.templates.add_card, t.add_card);
        overlay(&mut config.templates.modify_card, t.modify_card);
        overlay(&mut config.templates.delete_card, t.delete_card);

        Ok(config)
    }
}

/// Per-call options for converting diffs into attachments
#[derive(Clone)]
pub struct ConvertOptions {
    pub language: String,
    pub labels: Labels,
    pub templates: TemplateSources,
    pub links: Arc<dyn LinkBuilder>,
    pub differ: Arc<dyn TextDiffer>,
    /// Run the comment-children generator after the content generator
    pub include_comments: bool,
}

impl ConvertOptions {
    /// Korean defaults with plain links and the word-level markdown differ
    pub fn new() -> Self {
        Self::from_config(&NotifyConfig::default())
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        let links: Arc<dyn LinkBuilder> = match &config.server_root {
            Some(root) => Arc::new(ServerLinkBuilder::new(root.as_str())),
            None => Arc::new(PlainLinkBuilder),
        };
        Self {
            language: config.language.clone(),
            labels: config.labels.clone(),
            templates: config.templates.clone(),
            links,
            differ: Arc::new(MarkdownTextDiffer),
            include_comments: config.include_comments,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_templates(mut self, templates: TemplateSources) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_links(mut self, links: Arc<dyn LinkBuilder>) -> Self {
        self.links = links;
        self
    }

    pub fn with_differ(mut self, differ: Arc<dyn TextDiffer>) -> Self {
        self.differ = differ;
        self
    }

    pub fn with_comment_changes(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("language", &self.language)
            .field("labels", &self.labels)
            .field("templates", &self.templates)
            .field("include_comments", &self.include_comments)
            .finish_non_exhaustive()
    }
}
