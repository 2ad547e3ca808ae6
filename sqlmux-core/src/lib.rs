//! Core of the sqlmux connection-string multiplexer.
//!
//! This crate knows no dialect. It provides:
//!
//! - [`NormalizedUrl`]: a generic split of `<scheme>://<rest>`
//! - [`Provider`]: resolution (DSN plus schema name) and opening for one dialect
//! - [`ProviderRegistry`]: concurrent scheme to provider map
//! - [`Mux`]: normalize, dispatch, resolve, open
//! - [`Context`]: cancellation and deadlines for every operation
//!
//! Dialect providers live in `sqlmux-postgres`, `sqlmux-mysql` and `sqlmux-sqlite`;
//! the `sqlmux` crate wires them together.
//!
//! # Example
//!
//! ```rust
//! use sqlmux_core::{Context, Driver, Mux, provider_fn};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let mux = Mux::new();
//! mux.register_provider("key", provider_fn(|_ctx, _dsn, _opts| async {
//!     Ok(Driver::new("key", ()))
//! }))
//! .unwrap();
//!
//! let driver = mux.open_atlas(&Context::background(), "key://open", &[]).await.unwrap();
//! assert_eq!(driver.dialect(), "key");
//! # });
//! ```

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod logging;
pub mod mux;
pub mod provider;
pub mod registry;
pub mod url;

pub use config::{ConnectConfig, MuxConfig};
pub use context::Context;
pub use env::{EnvExpander, EnvSource, MapEnvSource, StdEnvSource};
pub use error::{BoxError, MuxError, MuxResult};
pub use mux::Mux;
pub use provider::{
    Driver, Provider, ProviderFn, ProviderOption, ProviderOptions, ResolvedConnection,
    provider_fn,
};
pub use registry::{ProviderRegistry, SharedProvider};
pub use url::{NormalizedUrl, percent_decode};
