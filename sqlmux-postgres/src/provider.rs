//! PostgreSQL provider.

use std::str::FromStr;

use async_trait::async_trait;
use sqlmux_core::{
    Context, Driver, MuxError, MuxResult, NormalizedUrl, Provider, ProviderOption,
    ProviderOptions, ResolvedConnection,
};
use tokio_postgres::NoTls;
use tracing::{debug, info, warn};

use crate::DIALECT;
use crate::config::PgConfig;
use crate::connection::PgDriver;

/// Resolves `postgres://` URLs and opens [`PgDriver`] sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresProvider;

impl PostgresProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }

    /// Build the client configuration for `dsn` with `options` applied.
    pub fn client_config(dsn: &str, options: &[ProviderOption]) -> MuxResult<tokio_postgres::Config> {
        let mut config = tokio_postgres::Config::from_str(dsn)
            .map_err(|e| MuxError::malformed(DIALECT, format!("invalid DSN: {}", e)))?;

        let options = ProviderOptions::from_slice(options);
        if let Some(timeout) = options.connect_timeout {
            config.connect_timeout(timeout);
        }
        if let Some(ref name) = options.application_name {
            config.application_name(name);
        }
        if options.read_only {
            let setting = "-c default_transaction_read_only=on";
            let merged = match config.get_options() {
                Some(existing) if !existing.is_empty() => format!("{} {}", existing, setting),
                _ => setting.to_string(),
            };
            config.options(&merged);
        }
        Ok(config)
    }
}

#[async_trait]
impl Provider for PostgresProvider {
    async fn resolve(&self, ctx: &Context, url: &NormalizedUrl) -> MuxResult<ResolvedConnection> {
        ctx.check()?;
        let config = PgConfig::from_url(url)?;
        debug!(host = %config.host, port = config.port, "Resolved PostgreSQL URL");
        Ok(ResolvedConnection::new(config.to_dsn(), config.schema_name()))
    }

    async fn open(
        &self,
        ctx: &Context,
        dsn: &str,
        options: &[ProviderOption],
    ) -> MuxResult<Driver> {
        let config = Self::client_config(dsn, options)?;
        let ctx = match ProviderOptions::from_slice(options).connect_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };

        debug!("Connecting to PostgreSQL");
        let (client, connection) = ctx
            .run(async {
                config
                    .connect(NoTls)
                    .await
                    .map_err(|e| MuxError::connectivity(DIALECT, e))
            })
            .await?;

        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        info!("PostgreSQL session established");
        Ok(Driver::new(DIALECT, PgDriver::new(client, handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn resolve(url: &str) -> MuxResult<ResolvedConnection> {
        let url = NormalizedUrl::parse(url)?;
        PostgresProvider::new().resolve(&Context::background(), &url).await
    }

    #[tokio::test]
    async fn test_resolve_schema_names() {
        let cases = [
            ("postgres://localhost:5432/dbname", ""),
            ("postgres://localhost:5432/dbname?search_path=", ""),
            ("postgres://localhost:5432/dbname?search_path=foo", "foo"),
        ];
        for (url, schema) in cases {
            assert_eq!(resolve(url).await.unwrap().schema_name, schema, "{}", url);
        }
    }

    #[tokio::test]
    async fn test_resolve_bad_host() {
        let err = resolve("postgres://(bad:host)?search_path=foo").await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_resolved_dsn_carries_search_path() {
        let resolved = resolve("postgres://localhost/app?search_path=foo").await.unwrap();
        let config = tokio_postgres::Config::from_str(&resolved.dsn).unwrap();
        assert_eq!(config.get_options(), Some("-c search_path=foo"));
    }

    #[test]
    fn test_client_config_applies_options() {
        let config = PostgresProvider::client_config(
            "host='localhost' user='app' options='-c search_path=foo'",
            &[
                ProviderOption::ConnectTimeout(Duration::from_secs(3)),
                ProviderOption::ApplicationName("sqlmux-test".into()),
                ProviderOption::ReadOnly,
            ],
        )
        .unwrap();
        assert_eq!(config.get_connect_timeout(), Some(&Duration::from_secs(3)));
        assert_eq!(config.get_application_name(), Some("sqlmux-test"));
        assert_eq!(
            config.get_options(),
            Some("-c search_path=foo -c default_transaction_read_only=on")
        );
    }

    #[test]
    fn test_client_config_rejects_garbage() {
        let err = PostgresProvider::client_config("host='unterminated", &[]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_open_closed_socket_is_connectivity() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let dsn = format!("host='127.0.0.1' port='{}' user='postgres'", port);
        let err = PostgresProvider::new()
            .open(&Context::background(), &dsn, &[])
            .await
            .unwrap_err();
        assert!(err.is_connectivity(), "{:?}", err);
    }

    #[tokio::test]
    async fn test_open_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let dsn = format!("host='127.0.0.1' port='{}' user='postgres'", port);
        let ctx = Context::background().with_timeout(Duration::from_millis(100));
        let err = PostgresProvider::new().open(&ctx, &dsn, &[]).await.unwrap_err();
        assert!(err.is_cancelled(), "{:?}", err);
    }
}
