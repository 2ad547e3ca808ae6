//! Logging setup.
//!
//! Libraries in this workspace only emit `tracing` events. Binaries call [`init`] to
//! install a subscriber (requires the `tracing-subscriber` feature).
//!
//! # Environment Variables
//!
//! - `SQLMUX_DEBUG=true|1|yes` - enable debug logging
//! - `SQLMUX_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `SQLMUX_LOG_FORMAT=json|pretty|compact` - output format (default: compact)

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check `SQLMUX_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("SQLMUX_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Level from `SQLMUX_LOG_LEVEL`, falling back to `debug` when `SQLMUX_DEBUG` is set
/// and `warn` otherwise.
pub fn log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("SQLMUX_LOG_LEVEL") {
        Ok(level) => parse_level(&level).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Format from `SQLMUX_LOG_FORMAT`.
pub fn log_format() -> &'static str {
    env::var("SQLMUX_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "json" => "json",
            "pretty" => "pretty",
            _ => "compact",
        })
        .unwrap_or("compact")
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Install the global subscriber using the environment settings.
///
/// Later calls are no-ops.
pub fn init() {
    init_with_level(log_level());
}

/// Install the global subscriber at `level`, writing to stderr.
///
/// Unknown levels fall back to `warn`. Later calls are no-ops.
pub fn init_with_level(level: &str) {
    let level = parse_level(level).unwrap_or("warn");
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!(
                "sqlmux={level},sqlmux_core={level},sqlmux_postgres={level},\
                 sqlmux_mysql={level},sqlmux_sqlite={level},sqlmux_cli={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let layer = fmt::layer().with_writer(std::io::stderr);
            match log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .init(),
                "pretty" => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.pretty())
                    .init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.compact())
                    .init(),
            }

            tracing::debug!(level = level, format = log_format(), "sqlmux logging initialized");
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = level;
        }
    });
}
