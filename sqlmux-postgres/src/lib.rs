//! # sqlmux-postgres
//!
//! PostgreSQL provider for sqlmux.
//!
//! - Resolves `postgres://` URLs into a libpq keyword/value DSN
//! - Reads the schema name from the `search_path` query parameter
//! - Opens a `tokio-postgres` session wrapped in [`PgDriver`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlmux_core::{Context, Mux};
//! use sqlmux_postgres::{PgDriver, PostgresProvider};
//!
//! let mux = Mux::new();
//! mux.register_provider("postgres", PostgresProvider::new())?;
//!
//! let driver = mux
//!     .open_atlas(&Context::background(), "postgres://localhost/app?search_path=public", &[])
//!     .await?;
//! let session = driver.downcast_ref::<PgDriver>().unwrap();
//! session.client().simple_query("SELECT 1").await?;
//! ```

pub mod config;
pub mod connection;
pub mod provider;

pub use config::PgConfig;
pub use connection::PgDriver;
pub use provider::PostgresProvider;

/// Dialect name reported by drivers and errors.
pub const DIALECT: &str = "postgres";
