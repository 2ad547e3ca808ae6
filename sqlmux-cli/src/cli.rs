//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sqlmux - inspect and probe database connection URLs
#[derive(Parser, Debug)]
#[command(name = "sqlmux")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "sqlmux - inspect and probe database connection URLs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./sqlmux.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the schema name a URL resolves to
    Schema(UrlArgs),

    /// Show the dialect, DSN and schema name for a URL
    Resolve(ResolveArgs),

    /// Open a connection to check that the database is reachable
    Ping(PingArgs),

    /// List registered schemes
    Providers,

    /// Display version information
    Version,
}

/// A connection URL argument
#[derive(Args, Debug, Clone, Default)]
pub struct UrlArgs {
    /// Connection URL; `${VAR}` references are expanded. Falls back to DATABASE_URL
    pub url: Option<String>,
}

/// Arguments for the `resolve` command
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub target: UrlArgs,

    /// Print passwords instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

/// Arguments for the `ping` command
#[derive(Args, Debug, Clone, Default)]
pub struct PingArgs {
    #[command(flatten)]
    pub target: UrlArgs,

    /// Give up after this many seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Open the session read-only
    #[arg(long)]
    pub read_only: bool,
}
