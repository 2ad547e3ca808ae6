//! `sqlmux schema` command - Print the schema name of a URL.

use crate::cli::{GlobalArgs, UrlArgs};
use crate::commands::{build_mux, signal_context, target_url};
use crate::error::CliResult;

/// Run the schema command
///
/// Prints the bare schema name (possibly an empty line) so the output can be used
/// in scripts.
pub async fn run(global: &GlobalArgs, args: UrlArgs) -> CliResult<()> {
    let url = target_url(&args)?;
    let mux = build_mux(global)?;
    let ctx = signal_context();

    let schema = mux.schema_name_from_url(&ctx, &url).await?;
    println!("{}", schema);
    Ok(())
}
