//! Operation boundary macros
//!
//! Every logged operation emits one `start` event and then exactly one of
//! `end` or `end_error`. Event names come from `cardnotify_core_types::schema`
//! through `$crate`, so downstream crates only depend on `cardnotify-core`.

/// Log the start of an operation
///
/// ```
/// # use cardnotify_core::log_op_start;
/// log_op_start!("convert_diffs");
/// log_op_start!("convert_diffs", diff_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use cardnotify_core::log_op_end;
/// log_op_end!("convert_diffs", duration_ms = 42, attachment_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation
///
/// `$err` is anything convertible into `ExError`; its code and, when set,
/// the failing entity (card, document or template key) are recorded.
///
/// ```
/// # use cardnotify_core::{log_op_error, errors::NotifyError};
/// let err = NotifyError::DocumentNotFound { card_id: "c1".to_string() };
/// log_op_error!("get_document", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.entity_id = ex_err.entity_id().unwrap_or(""),
            $($($field)*)?
        );
    }};
}
