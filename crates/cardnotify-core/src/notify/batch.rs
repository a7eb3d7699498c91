//! Batch conversion of a diff list.

use std::time::Instant;

use cardnotify_core_types::RequestContext;

use crate::config::ConvertOptions;
use crate::errors::{BatchError, ExError};
use crate::model::{Attachment, BlockType, Diff};
use crate::template::TemplateCache;
use crate::{log_op_end, log_op_error, log_op_start};

use super::builder::card_diff_to_attachment;

/// Attachments that rendered plus every per-diff failure
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub attachments: Vec<Attachment>,
    pub errors: BatchError,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Split into attachments and `Ok(())`/the aggregate
    pub fn into_parts(self) -> (Vec<Attachment>, std::result::Result<(), BatchError>) {
        (self.attachments, self.errors.into_result())
    }
}

/// Convert every card diff in `diffs`, in order
///
/// Non-card diffs are ignored. A failing diff contributes an entry to the
/// error aggregate and the batch moves on to the next one.
pub fn convert_diffs(
    cache: &TemplateCache,
    diffs: &[Diff],
    opts: &ConvertOptions,
    ctx: &RequestContext,
) -> BatchOutcome {
    let start = Instant::now();
    log_op_start!(
        "convert_diffs",
        request_id = ctx.request_id.as_str(),
        diff_count = diffs.len()
    );

    let mut outcome = BatchOutcome::default();
    for diff in diffs.iter().filter(|d| d.block_type == BlockType::Card) {
        match card_diff_to_attachment(cache, diff, opts) {
            Ok(Some(attachment)) => outcome.attachments.push(attachment),
            Ok(None) => {}
            Err(err) => {
                let mut err = ExError::from(err).with_request_id(ctx.request_id.clone());
                if let Some(trace_id) = &ctx.trace_id {
                    err = err.with_trace_id(trace_id.clone());
                }
                outcome.errors.push(err);
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    if let Some(first) = outcome.errors.errors().first() {
        log_op_error!(
            "convert_diffs",
            first.clone(),
            duration_ms = duration_ms,
            request_id = ctx.request_id.as_str(),
            attachment_count = outcome.attachments.len(),
            error_count = outcome.errors.len()
        );
    } else {
        log_op_end!(
            "convert_diffs",
            duration_ms = duration_ms,
            request_id = ctx.request_id.as_str(),
            attachment_count = outcome.attachments.len()
        );
    }

    outcome
}
