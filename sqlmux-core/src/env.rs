//! Environment variable expansion inside connection URLs.
//!
//! Supported references:
//! - `${VAR}`: required
//! - `${VAR:-default}`: `default` when unset or empty
//! - `${VAR:?message}`: required, failing with `message`
//! - `$VAR`: required, name runs over `[A-Za-z0-9_]`
//!
//! A `$` not followed by `{`, a letter or `_` is kept literally, so passwords such as
//! `pa$5` survive expansion.

use std::collections::HashMap;

use crate::error::{MuxError, MuxResult};

/// Environment variable that holds the fallback connection URL.
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get a variable's value.
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands variable references in connection URLs.
#[derive(Debug, Clone, Default)]
pub struct EnvExpander<S: EnvSource = StdEnvSource> {
    source: S,
}

impl EnvExpander<StdEnvSource> {
    /// Expander over the process environment.
    pub fn new() -> Self {
        Self {
            source: StdEnvSource,
        }
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Expander over a custom source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Expand every variable reference in `input`.
    ///
    /// ```rust
    /// use sqlmux_core::env::{EnvExpander, MapEnvSource};
    ///
    /// let expander = EnvExpander::with_source(MapEnvSource::new().set("PGHOST", "db"));
    /// assert_eq!(
    ///     expander.expand("postgres://${PGHOST}:${PGPORT:-5432}/app").unwrap(),
    ///     "postgres://db:5432/app"
    /// );
    /// ```
    pub fn expand(&self, input: &str) -> MuxResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(body) = after.strip_prefix('{') {
                let end = body.find('}').ok_or_else(|| MuxError::InvalidEnv {
                    name: body.to_string(),
                    message: "unterminated ${...} reference".to_string(),
                })?;
                out.push_str(&self.expand_braced(&body[..end])?);
                rest = &body[end + 1..];
            } else if after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                let len = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                let name = &after[..len];
                let value = self
                    .source
                    .get(name)
                    .ok_or_else(|| MuxError::EnvNotFound(name.to_string()))?;
                out.push_str(&value);
                rest = &after[len..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// The URL named by `DATABASE_URL`, expanded.
    pub fn database_url(&self) -> MuxResult<String> {
        let raw = self
            .source
            .get(DATABASE_URL)
            .ok_or_else(|| MuxError::EnvNotFound(DATABASE_URL.to_string()))?;
        self.expand(&raw)
    }

    fn expand_braced(&self, body: &str) -> MuxResult<String> {
        let (name, modifier) = match body.find(':') {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };

        if name.is_empty() {
            return Err(MuxError::InvalidEnv {
                name: String::new(),
                message: "empty variable name".to_string(),
            });
        }

        if let Some(value) = self.source.get(name).filter(|v| !v.is_empty()) {
            return Ok(value);
        }

        match modifier {
            Some(m) if m.starts_with('-') => Ok(m[1..].to_string()),
            Some(m) if m.starts_with('?') => Err(MuxError::InvalidEnv {
                name: name.to_string(),
                message: if m.len() > 1 {
                    m[1..].to_string()
                } else {
                    format!("required variable {:?} is not set", name)
                },
            }),
            _ => Err(MuxError::EnvNotFound(name.to_string())),
        }
    }
}

/// Expand variables in `input` from the process environment.
pub fn expand_env(input: &str) -> MuxResult<String> {
    EnvExpander::new().expand(input)
}
