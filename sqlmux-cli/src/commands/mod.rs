//! CLI command implementations.

pub mod ping;
pub mod providers;
pub mod resolve;
pub mod schema;
pub mod version;

use std::path::Path;

use sqlmux::config::CONFIG_FILE_NAME;
use sqlmux::env::DATABASE_URL;
use sqlmux::{
    Context, EnvExpander, Mux, MuxConfig, MuxError, StdEnvSource, builtin_mux_with_config,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{GlobalArgs, UrlArgs};
use crate::error::{CliError, CliResult};

/// Load the configuration named by `--config`, or `./sqlmux.toml` when present.
///
/// Environment overrides are applied on top.
pub fn load_config(global: &GlobalArgs) -> CliResult<MuxConfig> {
    let config = match global.config {
        Some(ref path) => MuxConfig::load(path)?,
        None => MuxConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?,
    };
    Ok(config.with_env(&StdEnvSource)?)
}

/// Build the multiplexer every command works with.
pub fn build_mux(global: &GlobalArgs) -> CliResult<Mux> {
    let config = load_config(global)?;
    Ok(builtin_mux_with_config(&config)?)
}

/// The URL to operate on: the argument, else `DATABASE_URL`, with variables expanded.
pub fn target_url(args: &UrlArgs) -> CliResult<String> {
    let expander = EnvExpander::new();
    match args.url {
        Some(ref url) => Ok(expander.expand(url)?),
        None => {
            debug!("No URL argument, falling back to DATABASE_URL");
            expander.database_url().map_err(|err| match err {
                MuxError::EnvNotFound(ref name) if name == DATABASE_URL => CliError::MissingUrl,
                other => CliError::Mux(other),
            })
        }
    }
}

/// A context cancelled when the process receives Ctrl-C.
pub fn signal_context() -> Context {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                eprintln!("\nReceived Ctrl-C. Cancelling...");
                cancel.cancel();
            }
            Err(err) => debug!(error = %err, "Ctrl-C handler unavailable"),
        }
    });
    Context::with_token(token)
}
