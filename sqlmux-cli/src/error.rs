//! CLI error types and result alias.

use miette::Diagnostic;
use sqlmux::MuxError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Resolution or connection failure
    #[error("{0}")]
    #[diagnostic(code(sqlmux::mux))]
    Mux(#[from] MuxError),

    /// No URL given and DATABASE_URL unset
    #[error("No connection URL given and DATABASE_URL is not set")]
    #[diagnostic(
        code(sqlmux::missing_url),
        help("pass a URL such as postgres://localhost/app or export DATABASE_URL")
    )]
    MissingUrl,
}
