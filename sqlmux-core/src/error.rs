//! Error types for connection resolution.
//!
//! Every stage of [`Mux::open_atlas`](crate::Mux::open_atlas) reports failures through
//! [`MuxError`]. Messages carry the offending URL fragment, path or scheme so a caller
//! can diagnose the failure without re-parsing the input.

use std::io;

use thiserror::Error;

/// Result type for multiplexer operations.
pub type MuxResult<T> = Result<T, MuxError>;

/// Boxed error coming from a dialect client library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving or opening a connection URL.
#[derive(Error, Debug)]
pub enum MuxError {
    /// The input does not parse as `<scheme>://...`, or the authority is invalid for
    /// the matched dialect.
    #[error("malformed connection URL {url:?}: {reason}")]
    MalformedUrl {
        /// The URL (or URL fragment) that failed to parse.
        url: String,
        /// What was wrong with it.
        reason: String,
    },

    /// No provider is registered for the scheme.
    #[error("unsupported scheme {0:?}: no provider registered")]
    UnsupportedScheme(String),

    /// A provider is already registered for the scheme.
    #[error("provider for scheme {0:?} is already registered")]
    DuplicateScheme(String),

    /// The SQLite target file does not exist and in-memory mode was not requested.
    #[error("failed opening {path:?}: stat {path}: {message}")]
    NotFound {
        /// Resolved filesystem path.
        path: String,
        /// Native stat failure text.
        message: String,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The SQLite target exists but could not be inspected.
    #[error("failed opening {path:?}: stat {path}: {message}")]
    FileAccess {
        /// Resolved filesystem path.
        path: String,
        /// Native stat failure text.
        message: String,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// Network dial, authentication or handshake failure.
    #[error("{dialect}: {message}")]
    Connectivity {
        /// Dialect that attempted the connection.
        dialect: String,
        /// Human readable description.
        message: String,
        /// Client library error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The caller cancelled the context.
    #[error("context canceled")]
    Cancelled,

    /// The context deadline passed before the operation finished.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Environment variable not found during URL expansion.
    #[error("environment variable not found: {0}")]
    EnvNotFound(String),

    /// Invalid environment variable reference.
    #[error("invalid environment variable {name:?}: {message}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// What was wrong.
        message: String,
    },
}

impl MuxError {
    /// Create a malformed URL error.
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connectivity error wrapping a client library error.
    pub fn connectivity<E>(dialect: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connectivity {
            dialect: dialect.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a connectivity error from a message alone.
    pub fn connectivity_msg(dialect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            dialect: dialect.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a failed `stat` of `path`.
    ///
    /// `NotFound` is reserved for a missing file; every other failure becomes
    /// `FileAccess`. Both render as `failed opening "<path>": stat <path>: <os text>`.
    pub fn stat(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        let message = os_error_text(&source);
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path,
                message,
                source,
            }
        } else {
            Self::FileAccess {
                path,
                message,
                source,
            }
        }
    }

    /// Check if this is a malformed URL error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedUrl { .. })
    }

    /// Check if the scheme had no registered provider.
    pub fn is_unsupported_scheme(&self) -> bool {
        matches!(self, Self::UnsupportedScheme(_))
    }

    /// Check if this is a duplicate registration.
    pub fn is_duplicate_scheme(&self) -> bool {
        matches!(self, Self::DuplicateScheme(_))
    }

    /// Check if a SQLite target file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a live-environment connection failure.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Check if the context was cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Render an I/O error the way the OS reports it: `no such file or directory`.
///
/// Rust appends ` (os error N)` and capitalizes the libc text; both are stripped so
/// the message reads like a native `stat` failure.
pub fn os_error_text(err: &io::Error) -> String {
    let text = err.to_string();
    let text = match (err.raw_os_error(), text.rfind(" (os error ")) {
        (Some(_), Some(idx)) => text[..idx].to_string(),
        _ => text,
    };

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => text,
    }
}
