//! `sqlmux ping` command - Open a connection and report the outcome.

use std::time::{Duration, Instant};

use sqlmux::ProviderOption;
use tracing::info;

use crate::cli::{GlobalArgs, PingArgs};
use crate::commands::{build_mux, signal_context, target_url};
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the ping command
pub async fn run(global: &GlobalArgs, args: PingArgs) -> CliResult<()> {
    let url = target_url(&args.target)?;
    let mux = build_mux(global)?;

    let mut options = Vec::new();
    let mut ctx = signal_context();
    if let Some(secs) = args.timeout {
        let timeout = Duration::from_secs(secs);
        options.push(ProviderOption::ConnectTimeout(timeout));
        ctx = ctx.with_timeout(timeout);
    }
    if args.read_only {
        options.push(ProviderOption::ReadOnly);
    }

    let started = Instant::now();
    let driver = mux.open_atlas(&ctx, &url, &options).await?;
    let elapsed = started.elapsed();
    info!(dialect = %driver.dialect(), elapsed_ms = elapsed.as_millis() as u64, "Ping succeeded");

    output::success(&format!("Connected to {}", driver.dialect()));
    kv("Time", &format!("{} ms", elapsed.as_millis()));
    if args.read_only {
        kv("Mode", "read-only");
    }
    drop(driver);
    Ok(())
}
