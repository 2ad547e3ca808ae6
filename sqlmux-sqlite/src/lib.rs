//! # sqlmux-sqlite
//!
//! SQLite provider for sqlmux.
//!
//! Resolution understands bare paths and the `file:` URI grammar, stats the target
//! file unless the URI asks for an in-memory database, and reports an empty schema
//! name. Opening yields a [`tokio_rusqlite::Connection`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlmux_core::{Context, Mux};
//! use sqlmux_sqlite::SqliteProvider;
//!
//! let mux = Mux::new();
//! mux.register_provider("sqlite", SqliteProvider::new())?;
//!
//! let driver = mux
//!     .open_atlas(&Context::background(), "sqlite://file:app.db?mode=memory", &[])
//!     .await?;
//! let conn: tokio_rusqlite::Connection = driver.into_inner().unwrap();
//! ```

pub mod config;
pub mod provider;

pub use config::{AccessMode, SqliteConfig};
pub use provider::SqliteProvider;

/// Dialect name reported by drivers and errors.
pub const DIALECT: &str = "sqlite";
