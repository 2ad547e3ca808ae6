//! `sqlmux resolve` command - Show how a URL resolves.

use sqlmux::NormalizedUrl;

use crate::cli::{GlobalArgs, ResolveArgs};
use crate::commands::{build_mux, signal_context, target_url};
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the resolve command
pub async fn run(global: &GlobalArgs, args: ResolveArgs) -> CliResult<()> {
    let url = target_url(&args.target)?;
    let mux = build_mux(global)?;
    let ctx = signal_context();

    let normalized = NormalizedUrl::parse(&url)?;
    let resolved = mux.resolve(&ctx, &url).await?;

    let dsn = if args.show_secrets {
        resolved.dsn.clone()
    } else {
        output::redact_dsn(&resolved.dsn)
    };
    let schema = if resolved.schema_name.is_empty() {
        "(none)"
    } else {
        resolved.schema_name.as_str()
    };

    output::section("Resolved connection");
    kv("Scheme", normalized.scheme());
    kv("DSN", &dsn);
    kv("Schema", schema);
    Ok(())
}
