//! SQLite provider.

use async_trait::async_trait;
use rusqlite::OpenFlags;
use sqlmux_core::{
    Context, Driver, MuxError, MuxResult, NormalizedUrl, Provider, ProviderOption,
    ProviderOptions, ResolvedConnection,
};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::DIALECT;
use crate::config::SqliteConfig;

/// Resolves `sqlite://` URLs and opens `tokio_rusqlite::Connection` drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteProvider;

impl SqliteProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }

    /// Flags used to open `dsn`. URIs are always enabled so `file:` DSNs work.
    pub fn open_flags(options: &[ProviderOption]) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if ProviderOptions::from_slice(options).read_only {
            base | OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        }
    }
}

#[async_trait]
impl Provider for SqliteProvider {
    async fn resolve(&self, ctx: &Context, url: &NormalizedUrl) -> MuxResult<ResolvedConnection> {
        let config = SqliteConfig::from_url(url)?;
        config.check_exists(ctx).await?;
        debug!(path = %config.path, memory = config.is_memory(), "Resolved SQLite URL");
        Ok(ResolvedConnection::new(config.to_dsn(), config.schema_name()))
    }

    async fn open(
        &self,
        ctx: &Context,
        dsn: &str,
        options: &[ProviderOption],
    ) -> MuxResult<Driver> {
        let flags = Self::open_flags(options);
        let ctx = match ProviderOptions::from_slice(options).connect_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };

        debug!(dsn = %dsn, "Opening SQLite database");
        let dsn = dsn.to_string();
        let conn = ctx
            .run(async {
                Connection::open_with_flags(&dsn, flags)
                    .await
                    .map_err(|e| MuxError::connectivity(DIALECT, e))
            })
            .await?;

        info!(dsn = %dsn, "SQLite database opened");
        Ok(Driver::new(DIALECT, conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn resolve(url: &str) -> MuxResult<ResolvedConnection> {
        let url = NormalizedUrl::parse(url)?;
        SqliteProvider::new().resolve(&Context::background(), &url).await
    }

    #[tokio::test]
    async fn test_resolve_missing_file_message() {
        let err = resolve("sqlite://file:/home/fred/data.db").await.unwrap_err();
        assert!(err.is_not_found());
        #[cfg(target_os = "linux")]
        assert_eq!(
            err.to_string(),
            r#"failed opening "/home/fred/data.db": stat /home/fred/data.db: no such file or directory"#
        );
    }

    #[tokio::test]
    async fn test_resolve_memory() {
        let resolved = resolve("sqlite://file:test.db?cache=shared&mode=memory").await.unwrap();
        assert_eq!(resolved.schema_name, "");
        assert_eq!(resolved.dsn, "file:test.db?cache=shared&mode=memory");
    }

    #[tokio::test]
    async fn test_open_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        std::fs::File::create(&path).unwrap();

        let url = format!("sqlite://file://{}", path.display());
        let resolved = resolve(&url).await.unwrap();
        let driver = SqliteProvider::new()
            .open(&Context::background(), &resolved.dsn, &[])
            .await
            .unwrap();
        assert_eq!(driver.dialect(), "sqlite");

        let conn = driver.into_inner::<Connection>().unwrap();
        let one: i64 = conn
            .call(|c| {
                c.query_row("SELECT 1", [], |row| row.get(0))
                    .map_err(Into::into)
            })
            .await
            .unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_open_read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.db");
        std::fs::File::create(&path).unwrap();

        let driver = SqliteProvider::new()
            .open(
                &Context::background(),
                &path.display().to_string(),
                &[ProviderOption::ReadOnly],
            )
            .await
            .unwrap();
        let conn = driver.into_inner::<Connection>().unwrap();
        let result = conn
            .call(|c| {
                c.execute("CREATE TABLE t (id INTEGER)", [])
                    .map_err(Into::into)
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_open_missing_directory_is_connectivity() {
        let dir = tempfile::tempdir().unwrap();
        let dsn = dir.path().join("missing").join("x.db").display().to_string();
        let err = SqliteProvider::new()
            .open(&Context::background(), &dsn, &[])
            .await
            .unwrap_err();
        assert!(err.is_connectivity(), "{:?}", err);
    }

    #[tokio::test]
    async fn test_open_cancelled() {
        let ctx = Context::background();
        ctx.cancel();
        let err = SqliteProvider::new().open(&ctx, ":memory:", &[]).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
