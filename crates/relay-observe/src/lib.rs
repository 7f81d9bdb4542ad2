//! Logging setup for relay binaries.
//!
//! Library crates only emit `tracing` records; this crate installs the global subscriber
//! that formats them.
mod logger;
pub use logger::*;
