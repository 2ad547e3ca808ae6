//! # sqlmux
//!
//! A connection-string multiplexer: one URL in, the dialect, a dialect-native DSN,
//! the current schema name and a live driver out.
//!
//! sqlmux provides:
//! - A generic URL normalizer and a concurrent provider registry ([`sqlmux_core`])
//! - PostgreSQL, MySQL and SQLite providers, each behind a cargo feature
//! - [`builtin_mux`] to compose a [`Mux`] with every enabled provider
//! - [`default_mux`], [`open_atlas`] and [`schema_name_from_url`] for quick call sites
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqlmux::{Context, builtin_mux};
//!
//! # async fn run() -> sqlmux::MuxResult<()> {
//! let mux = builtin_mux()?;
//! let ctx = Context::background();
//!
//! let schema = mux
//!     .schema_name_from_url(&ctx, "postgres://localhost:5432/app?search_path=tenant")
//!     .await?;
//! assert_eq!(schema, "tenant");
//!
//! let driver = mux.open_atlas(&ctx, "sqlite://file:app.db?mode=memory", &[]).await?;
//! assert_eq!(driver.dialect(), "sqlite");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::OnceLock;

use tracing::{debug, error};

pub use sqlmux_core::{
    BoxError, ConnectConfig, Context, Driver, EnvExpander, EnvSource, MapEnvSource, Mux,
    MuxConfig, MuxError, MuxResult, NormalizedUrl, Provider, ProviderFn, ProviderOption,
    ProviderOptions, ProviderRegistry, ResolvedConnection, SharedProvider, StdEnvSource,
    provider_fn,
};

pub use sqlmux_core::{config, env, logging, url};

/// PostgreSQL provider.
#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub mod postgres {
    pub use sqlmux_postgres::*;
}

/// MySQL provider.
#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub mod mysql {
    pub use sqlmux_mysql::*;
}

/// SQLite provider.
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite {
    pub use sqlmux_sqlite::*;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Context, Driver, Mux, MuxConfig, MuxError, MuxResult, Provider, ProviderOption,
        builtin_mux, builtin_mux_with_config,
    };
}

static DEFAULT_MUX: OnceLock<Result<Mux, String>> = OnceLock::new();

/// Build a [`Mux`] with every enabled built-in provider and the default aliases.
pub fn builtin_mux() -> MuxResult<Mux> {
    builtin_mux_with_config(&MuxConfig::default())
}

/// Build a [`Mux`] with every enabled built-in provider, `config`'s default options and
/// its aliases.
///
/// Aliases pointing at a provider whose feature is disabled are skipped.
pub fn builtin_mux_with_config(config: &MuxConfig) -> MuxResult<Mux> {
    let mux = Mux::from_config(config);

    #[cfg(feature = "postgres")]
    mux.register_provider(sqlmux_postgres::DIALECT, sqlmux_postgres::PostgresProvider::new())?;
    #[cfg(feature = "mysql")]
    mux.register_provider(sqlmux_mysql::DIALECT, sqlmux_mysql::MysqlProvider::new())?;
    #[cfg(feature = "sqlite")]
    mux.register_provider(sqlmux_sqlite::DIALECT, sqlmux_sqlite::SqliteProvider::new())?;

    let mut enabled = config.clone();
    enabled.aliases.retain(|alias, target| {
        let present = mux.registry().contains(target);
        if !present {
            debug!(alias = %alias, target = %target, "Alias target not registered, skipping");
        }
        present
    });
    mux.apply_aliases(&enabled)?;

    debug!(schemes = ?mux.schemes(), "Built-in multiplexer ready");
    Ok(mux)
}

/// Process-wide multiplexer built from [`builtin_mux`] on first use.
///
/// A failed build is remembered, and every call reports its cause.
/// Code that needs custom providers or configuration should own a [`Mux`] instead.
pub fn default_mux() -> MuxResult<&'static Mux> {
    shared_mux(&DEFAULT_MUX, builtin_mux)
}

fn shared_mux(
    cell: &'static OnceLock<Result<Mux, String>>,
    build: impl FnOnce() -> MuxResult<Mux>,
) -> MuxResult<&'static Mux> {
    cell.get_or_init(|| {
        build().map_err(|err| {
            error!(error = %err, "Failed to register built-in providers");
            err.to_string()
        })
    })
    .as_ref()
    .map_err(|reason| MuxError::config(format!("built-in providers unavailable: {}", reason)))
}

/// Resolve `url` and open a driver through [`default_mux`].
pub async fn open_atlas(
    ctx: &Context,
    url: &str,
    options: &[ProviderOption],
) -> MuxResult<Driver> {
    default_mux()?.open_atlas(ctx, url, options).await
}

/// Resolve the schema name of `url` through [`default_mux`].
pub async fn schema_name_from_url(ctx: &Context, url: &str) -> MuxResult<String> {
    default_mux()?.schema_name_from_url(ctx, url).await
}
