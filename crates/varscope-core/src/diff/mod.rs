//! Snapshot pruning.
//!
//! Compares a fresh snapshot with the previous snapshot of the same variable
//! and replaces every subtree that did not change with an `unchanged` marker,
//! so that only the difference needs to be stored.
//!
//! ## Entry point
//!
//! ```
//! use varscope_core::diff::diff;
//! use varscope_core::inspect::inspect;
//!
//! let before = inspect("xs", &vec![1, 1, 2], 5);
//! let after = inspect("xs", &vec![1, 1, 2, 9], 5);
//!
//! let pruned = diff(after, &before);
//! assert!(!pruned.unchanged);
//! ```
//!
//! ## Guarantees
//!
//! - Only the newer tree is rewritten; the previous tree is borrowed.
//! - A node that differs at its own level is never replaced, though its
//!   matching descendants may be.
//! - Snapshots of differently named variables are a total mismatch and come
//!   back untouched.

pub mod engine;

pub use engine::{diff, Pruned};
