//! Core types shared across varscope facilities
//!
//! This crate carries the canonical schema constants used by the logging
//! facility and by the store when it emits structured events.

pub mod schema;
