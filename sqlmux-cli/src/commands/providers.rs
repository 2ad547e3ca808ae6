//! `sqlmux providers` command - List registered schemes.

use crate::cli::GlobalArgs;
use crate::commands::build_mux;
use crate::error::CliResult;
use crate::output;

/// Run the providers command
pub async fn run(global: &GlobalArgs) -> CliResult<()> {
    let mux = build_mux(global)?;

    output::section("Registered schemes");
    for scheme in mux.schemes() {
        output::list_item(&scheme);
    }
    Ok(())
}
