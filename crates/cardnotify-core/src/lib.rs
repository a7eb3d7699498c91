//! cardnotify core - diff-to-notification rendering engine
//!
//! This crate turns before/after comparisons of a card and its children
//! into chat attachments:
//! - Card, block and diff models, plus the card document record
//! - A template language with bound helpers and a per-engine compile cache
//! - Field generators for title, property, attachment, comment and content changes
//! - A mention filter that drops content already delivered as a mention
//! - Batch conversion with per-diff error aggregation
//!
//! The engine does no I/O. Link building and text diffing are injected
//! through [`links::LinkBuilder`] and [`textdiff::TextDiffer`].

pub mod config;
pub mod errors;
pub mod format;
pub mod links;
pub mod logging_facility;
pub mod model;
pub mod notify;
pub mod template;
pub mod textdiff;

#[doc(hidden)]
pub use cardnotify_core_types as core_types;

// Re-export commonly used types
pub use config::{ConvertOptions, Labels, NotifyConfig, TemplateSources};
pub use errors::{BatchError, ExError, ExErrorKind, NotifyError, Result};
pub use links::{LinkBuilder, PlainLinkBuilder, ServerLinkBuilder};
pub use model::{Attachment, AttachmentField, AuthorSet, Block, BlockType, Board, Diff, PropDiff};
pub use notify::{convert_diffs, BatchOutcome, NotifyEngine};
pub use template::TemplateCache;
pub use textdiff::{MarkdownTextDiffer, TextDiffer};
