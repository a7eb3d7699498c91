//! Notification templates: compilation, helpers and the per-engine cache.

pub mod cache;
pub mod compile;
pub mod helpers;

pub use cache::{TemplateCache, TemplateKey};
pub use compile::{compile, CompiledTemplate};
pub use helpers::Helper;
