//! SQLite URL resolution.
//!
//! Everything after `sqlite://` is either a bare filesystem path or a `file:` URI:
//!
//! | Input | Path |
//! |---|---|
//! | `test.db?cache=shared` | `test.db` (query ignored) |
//! | `file:data.db?mode=ro` | `data.db` |
//! | `file:/home/fred/data.db` | `/home/fred/data.db` |
//! | `file:///home/fred/data.db` | `/home/fred/data.db` |
//! | `file://localhost/home/fred/data.db` | `/localhost/home/fred/data.db` |
//!
//! A `file:` URI carrying `mode=memory` is in-memory and skips the existence check,
//! even when its path is empty.

use sqlmux_core::{Context, MuxError, MuxResult, NormalizedUrl, percent_decode};
use tracing::debug;

/// Name SQLite reserves for a private in-memory database.
pub const MEMORY: &str = ":memory:";

/// Access mode requested through the `mode` URI parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// No `mode` given.
    #[default]
    Default,
    /// `mode=ro` or `mode=readonly`.
    ReadOnly,
    /// `mode=rw`.
    ReadWrite,
    /// `mode=rwc`.
    ReadWriteCreate,
    /// `mode=memory`.
    Memory,
}

/// SQLite connection settings derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Filesystem path, or `:memory:`.
    pub path: String,
    /// Whether the input used the `file:` URI form.
    pub uri: bool,
    /// URI query, kept for SQLite to interpret. Always `None` for bare paths.
    pub query: Option<String>,
    /// Access mode from the query.
    pub mode: AccessMode,
    /// VFS name from the query.
    pub vfs: Option<String>,
}

impl SqliteConfig {
    /// Parse a normalized `sqlite://` URL.
    pub fn from_url(url: &NormalizedUrl) -> MuxResult<Self> {
        Self::parse(url.opaque()).map_err(|reason| MuxError::malformed(url.as_str(), reason))
    }

    /// Parse the part of a SQLite URL after `sqlite://`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let config = match input.strip_prefix("file:") {
            Some(uri) => Self::parse_uri(uri),
            None => {
                let (path, _) = input.split_once('?').unwrap_or((input, ""));
                Self {
                    path: path.to_string(),
                    uri: false,
                    query: None,
                    mode: if path == MEMORY {
                        AccessMode::Memory
                    } else {
                        AccessMode::Default
                    },
                    vfs: None,
                }
            }
        };

        if config.path.is_empty() && !config.is_memory() {
            return Err("database path is required".to_string());
        }
        Ok(config)
    }

    fn parse_uri(uri: &str) -> Self {
        let (uri, _) = uri.split_once('#').unwrap_or((uri, ""));
        let (location, query) = match uri.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (uri, None),
        };

        let path = match location.strip_prefix("//") {
            Some(rest) => match rest.find('/') {
                // `file:///abs`: empty authority is dropped.
                Some(0) => rest.to_string(),
                // `file://host/abs`: the authority becomes the first path segment.
                _ => format!("/{}", rest),
            },
            None => location.to_string(),
        };

        let mut mode = AccessMode::Default;
        let mut vfs = None;
        for pair in query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode(value);
            match key {
                "mode" => {
                    mode = match value.as_str() {
                        "ro" | "readonly" => AccessMode::ReadOnly,
                        "rw" => AccessMode::ReadWrite,
                        "rwc" => AccessMode::ReadWriteCreate,
                        "memory" => AccessMode::Memory,
                        other => {
                            debug!(mode = %other, "Unrecognized SQLite access mode");
                            mode
                        }
                    }
                }
                "vfs" => vfs = Some(value),
                _ => {}
            }
        }
        if path == MEMORY {
            mode = AccessMode::Memory;
        }

        Self {
            path,
            uri: true,
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            mode,
            vfs,
        }
    }

    /// Whether the database lives in memory.
    pub fn is_memory(&self) -> bool {
        self.mode == AccessMode::Memory
    }

    /// Whether the URL asked for a read-only database.
    pub fn is_read_only(&self) -> bool {
        self.mode == AccessMode::ReadOnly
    }

    /// Schema name. SQLite has none to report.
    pub fn schema_name(&self) -> &str {
        ""
    }

    /// Render the string handed to SQLite.
    ///
    /// `file:` URIs keep their query so SQLite applies `mode`, `cache` and `vfs`;
    /// `mode=readonly` is spelled `mode=ro`, the only form SQLite accepts.
    pub fn to_dsn(&self) -> String {
        if !self.uri {
            return self.path.clone();
        }
        match self.query {
            Some(ref query) => {
                let query = query
                    .split('&')
                    .map(|pair| if pair == "mode=readonly" { "mode=ro" } else { pair })
                    .collect::<Vec<_>>()
                    .join("&");
                format!("file:{}?{}", self.path, query)
            }
            None => format!("file:{}", self.path),
        }
    }

    /// Stat the database file unless it is in memory.
    ///
    /// The context is checked before and after the stat.
    pub async fn check_exists(&self, ctx: &Context) -> MuxResult<()> {
        if self.is_memory() {
            debug!(path = %self.path, "In-memory database, skipping existence check");
            return Ok(());
        }

        ctx.check()?;
        let result = tokio::fs::metadata(&self.path).await;
        ctx.check()?;

        result
            .map(|_| ())
            .map_err(|e| MuxError::stat(self.path.clone(), e))
    }
}
