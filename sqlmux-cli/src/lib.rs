//! sqlmux CLI - inspect and probe database connection URLs.
//!
//! This crate provides the `sqlmux` binary: resolve a URL to its dialect, DSN and
//! schema name, or open a connection to check reachability.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
