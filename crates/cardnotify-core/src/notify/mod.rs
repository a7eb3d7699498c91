//! Diff-to-notification conversion.
//!
//! [`NotifyEngine`] owns a template cache and the conversion options;
//! the free functions underneath are usable on their own with any cache.

pub mod batch;
pub mod builder;
pub mod fields;
pub mod mention;

use std::sync::Arc;

use cardnotify_core_types::RequestContext;

use crate::config::{ConvertOptions, NotifyConfig};
use crate::errors::Result;
use crate::model::{Attachment, Diff};
use crate::template::TemplateCache;

pub use batch::{convert_diffs, BatchOutcome};
pub use builder::card_diff_to_attachment;
pub use mention::{contains_mention, format_mention_message, MentionFilter, MentionMessage};

/// Rendering engine: one template cache shared by every conversion
#[derive(Debug, Clone)]
pub struct NotifyEngine {
    cache: Arc<TemplateCache>,
    options: ConvertOptions,
}

impl NotifyEngine {
    pub fn new(options: ConvertOptions) -> Self {
        Self::with_cache(Arc::new(TemplateCache::new()), options)
    }

    /// Engine sharing an existing cache, e.g. across option sets
    pub fn with_cache(cache: Arc<TemplateCache>, options: ConvertOptions) -> Self {
        Self { cache, options }
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        Self::new(ConvertOptions::from_config(config))
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a diff list under a fresh request context
    pub fn convert(&self, diffs: &[Diff]) -> BatchOutcome {
        self.convert_with_context(diffs, &RequestContext::new())
    }

    pub fn convert_with_context(&self, diffs: &[Diff], ctx: &RequestContext) -> BatchOutcome {
        convert_diffs(&self.cache, diffs, &self.options, ctx)
    }

    /// Attachment for a single card diff
    ///
    /// # Errors
    ///
    /// Returns the template compile or execution error for this card.
    pub fn card_attachment(&self, card_diff: &Diff) -> Result<Option<Attachment>> {
        card_diff_to_attachment(&self.cache, card_diff, &self.options)
    }
}

impl Default for NotifyEngine {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}
