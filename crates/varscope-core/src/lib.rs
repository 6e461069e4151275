//! Varscope Core - variable snapshots and snapshot pruning
//!
//! This crate provides:
//! - The `Inspect` capability and the introspector that turns a value graph
//!   into a bounded, cycle-safe `Node` tree
//! - The differ that prunes a snapshot against the previous snapshot of the
//!   same variable
//! - A `Tracker` that keeps per-variable history for the differ
//! - The error facility, logging facility and configuration shared by the
//!   other varscope crates

pub mod config;
pub mod diff;
pub mod errors;
pub mod inspect;
pub mod logging_facility;
pub mod node;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use diff::{diff, Pruned};
pub use errors::{Result, VarscopeError, VsError, VsErrorKind};
pub use inspect::{inspect, Inspect, Introspector};
pub use node::{Metatype, Node, NodeValue};
pub use tracker::Tracker;
