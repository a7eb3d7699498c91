//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the engine, the store
//! and the CLI so that log queries stay stable.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_BOARD_ID: &str = "board_id";
pub const FIELD_CARD_ID: &str = "card_id";
pub const FIELD_DOC_ID: &str = "doc_id";
pub const FIELD_BLOCK_TYPE: &str = "block_type";
pub const FIELD_TEMPLATE_KEY: &str = "template_key";

// Collection sizes
pub const FIELD_DIFF_COUNT: &str = "diff_count";
pub const FIELD_ATTACHMENT_COUNT: &str = "attachment_count";
pub const FIELD_ERROR_COUNT: &str = "error_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
