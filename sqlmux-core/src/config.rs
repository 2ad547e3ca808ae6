//! Multiplexer configuration.
//!
//! Loaded from a TOML file (conventionally `sqlmux.toml`) and optionally overridden
//! from the environment:
//!
//! ```toml
//! [connect]
//! timeout_secs = 10
//! application_name = "sqlmux"
//! read_only = false
//!
//! [aliases]
//! postgresql = "postgres"
//! mariadb = "mysql"
//! sqlite3 = "sqlite"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::EnvSource;
use crate::error::{MuxError, MuxResult};
use crate::provider::ProviderOption;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "sqlmux.toml";

/// Environment variable overriding the connect timeout, in seconds.
pub const ENV_CONNECT_TIMEOUT: &str = "SQLMUX_CONNECT_TIMEOUT";

/// Environment variable overriding the application name.
pub const ENV_APPLICATION_NAME: &str = "SQLMUX_APPLICATION_NAME";

/// Multiplexer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuxConfig {
    /// Defaults applied to every open.
    pub connect: ConnectConfig,

    /// Extra schemes mapped onto registered ones.
    /// Key: alias, Value: target scheme.
    pub aliases: BTreeMap<String, String>,
}

impl Default for MuxConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("postgresql".to_string(), "postgres".to_string());
        aliases.insert("mariadb".to_string(), "mysql".to_string());
        aliases.insert("sqlite3".to_string(), "sqlite".to_string());

        Self {
            connect: ConnectConfig::default(),
            aliases,
        }
    }
}

/// Connection defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Connect timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Application name reported to servers that support it.
    pub application_name: Option<String>,

    /// Open every connection read-only.
    pub read_only: bool,
}

impl MuxConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> MuxResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MuxError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> MuxResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> MuxResult<Self> {
        toml::from_str(content)
            .map_err(|e| MuxError::config(format!("failed to parse TOML: {}", e)))
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> MuxResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MuxError::config(format!("failed to serialize TOML: {}", e)))
    }

    /// Apply overrides from `SQLMUX_CONNECT_TIMEOUT` and `SQLMUX_APPLICATION_NAME`.
    pub fn with_env<S: EnvSource>(mut self, source: &S) -> MuxResult<Self> {
        if let Some(value) = source.get(ENV_CONNECT_TIMEOUT) {
            let secs = value.trim().parse::<u64>().map_err(|_| MuxError::InvalidEnv {
                name: ENV_CONNECT_TIMEOUT.to_string(),
                message: format!("expected whole seconds, got {:?}", value),
            })?;
            self.connect.timeout_secs = Some(secs);
        }
        if let Some(value) = source.get(ENV_APPLICATION_NAME) {
            self.connect.application_name = Some(value);
        }
        Ok(self)
    }

    /// Connect defaults as provider options.
    pub fn default_options(&self) -> Vec<ProviderOption> {
        let mut options = Vec::new();
        if let Some(secs) = self.connect.timeout_secs {
            options.push(ProviderOption::ConnectTimeout(Duration::from_secs(secs)));
        }
        if let Some(ref name) = self.connect.application_name {
            options.push(ProviderOption::ApplicationName(name.clone()));
        }
        if self.connect.read_only {
            options.push(ProviderOption::ReadOnly);
        }
        options
    }
}
