//! Varscope Store - SQLite persistence for snapshot trees
//!
//! Provides:
//! - SQLite schema with an embedded migrations framework
//! - Session and record queries for the viewer
//! - A background recorder that persists snapshots off the caller's thread

pub mod db;
pub mod errors;
pub mod migrations;
pub mod recorder;
pub mod records;
pub mod session;

// Re-export key types
pub use errors::Result;
pub use recorder::{Recorder, RecorderStats, Submission};
pub use records::{list_records, RecordRow, DEFAULT_PAGE_SIZE};
pub use session::{fetch_session, list_sessions, SessionRow};
