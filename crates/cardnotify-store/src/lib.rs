//! cardnotify store - SQLite persistence for card documents
//!
//! Provides:
//! - Connection management (`db`)
//! - Embedded, checksummed schema migrations
//! - `DocumentRepo`, the key-by-card document store

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::DocumentRepo;
