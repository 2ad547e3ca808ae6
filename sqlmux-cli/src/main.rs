//! sqlmux CLI - inspect and probe database connection URLs.

use clap::Parser;
use miette::Diagnostic;

use sqlmux::logging;
use sqlmux_cli::cli::{Cli, Command};
use sqlmux_cli::commands;
use sqlmux_cli::error::CliResult;
use sqlmux_cli::output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.global.verbose {
        logging::init_with_level("debug");
    } else {
        logging::init();
    }

    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        if let Some(help) = e.help() {
            output::hint(&help.to_string());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let global = cli.global;
    match cli.command {
        Command::Schema(args) => commands::schema::run(&global, args).await,
        Command::Resolve(args) => commands::resolve::run(&global, args).await,
        Command::Ping(args) => commands::ping::run(&global, args).await,
        Command::Providers => commands::providers::run(&global).await,
        Command::Version => commands::version::run(&global).await,
    }
}
