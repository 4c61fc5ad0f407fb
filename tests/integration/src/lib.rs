//! End-to-end helpers for the discover API
//!
//! Servers run against the in-memory backend on an ephemeral port, so the
//! tests need no external services.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
