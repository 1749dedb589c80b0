//! Cassandra-to-GCS job property validation CLI.
//!
//! The `c2g` binary loads job properties, resolves them into a validated
//! job configuration, and reports the result. This library holds the pieces
//! shared between the binary and its tests:
//! - Exit codes
//! - Logging setup
//! - Report rendering

pub mod exit_codes;
pub mod logging;
pub mod render;
