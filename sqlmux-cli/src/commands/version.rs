//! `sqlmux version` command - Version, compiled dialects and effective connect defaults.

use std::path::Path;

use sqlmux::config::CONFIG_FILE_NAME;

use crate::cli::GlobalArgs;
use crate::commands::{build_mux, load_config};
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the version command
pub async fn run(global: &GlobalArgs) -> CliResult<()> {
    let config = load_config(global)?;
    let mux = build_mux(global)?;

    output::header(&format!("sqlmux {}", env!("CARGO_PKG_VERSION")));
    kv("Version", env!("CARGO_PKG_VERSION"));
    kv("Dialects", &compiled_dialects().join(", "));
    kv("Schemes", &mux.schemes().join(", "));

    let source = match global.config {
        Some(ref path) => path.display().to_string(),
        None if Path::new(CONFIG_FILE_NAME).exists() => CONFIG_FILE_NAME.to_string(),
        None => "(defaults)".to_string(),
    };
    output::section("Connect defaults");
    kv("Config", &source);
    kv(
        "Timeout",
        &config
            .connect
            .timeout_secs
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "(driver default)".to_string()),
    );
    kv(
        "Application",
        config.connect.application_name.as_deref().unwrap_or("(none)"),
    );
    kv("Read-only", if config.connect.read_only { "yes" } else { "no" });

    Ok(())
}

/// Dialect providers compiled into this binary.
fn compiled_dialects() -> Vec<&'static str> {
    let mut dialects = Vec::new();
    #[cfg(feature = "postgres")]
    dialects.push(sqlmux::postgres::DIALECT);
    #[cfg(feature = "mysql")]
    dialects.push(sqlmux::mysql::DIALECT);
    #[cfg(feature = "sqlite")]
    dialects.push(sqlmux::sqlite::DIALECT);
    if dialects.is_empty() {
        dialects.push("none");
    }
    dialects
}
