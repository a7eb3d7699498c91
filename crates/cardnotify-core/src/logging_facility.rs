//! Structured logging facility for cardnotify
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The engine never installs a subscriber on its own. With no subscriber
//! installed every event is dropped, which is the no-op logger callers get
//! by default.
//!
//! # Usage
//!
//! ```rust
//! use cardnotify_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
