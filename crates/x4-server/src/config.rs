//! Configuration loading and typed config structures for the hub server.
//!
//! The configuration lives in `x4-hub.yaml` in the working directory. Every
//! field has a default, so a missing file or a partial file is fine.
//! Environment variables override the file:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `X4_HUB_HOST` | `server.host` |
//! | `X4_HUB_PORT` | `server.port` |
//! | `X4_HUB_CONNECTION_TIMEOUT_MS` | `connection.timeout_ms` |

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "x4-hub.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Env {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level hub configuration. Mirrors the structure of `x4-hub.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HubConfig {
    /// HTTP listener and middleware.
    #[serde(default)]
    pub server: ServerConfig,

    /// Connectivity heuristic.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HubConfig {
    /// Load from `path` if it exists, defaults otherwise, then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// override is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a YAML file. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `X4_HUB_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a numeric override does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a numeric override does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(host) = lookup("X4_HUB_HOST") {
            self.server.host = host;
        }
        if let Some(value) = lookup("X4_HUB_PORT") {
            self.server.port = value.parse().map_err(|e| ConfigError::Env {
                name: "X4_HUB_PORT",
                reason: format!("{e}"),
                value,
            })?;
        }
        if let Some(value) = lookup("X4_HUB_CONNECTION_TIMEOUT_MS") {
            self.connection.timeout_ms = value.parse().map_err(|e| ConfigError::Env {
                name: "X4_HUB_CONNECTION_TIMEOUT_MS",
                reason: format!("{e}"),
                value,
            })?;
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Log every HTTP request.
    #[serde(default = "default_true")]
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: true,
            request_logging: true,
        }
    }
}

/// Connectivity heuristic settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Milliseconds after the last full snapshot the game counts as
    /// connected.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ConnectionConfig {
    /// The timeout as a [`Duration`].
    pub const fn timeout(self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = HubConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors);
        assert!(config.server.request_logging);
        assert_eq!(config.connection.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = HubConfig::parse("server:\n  port: 9000\n  cors: false\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(!config.server.cors);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.connection.timeout_ms, 30_000);
    }

    #[test]
    fn empty_yaml_object_is_default() {
        let config = HubConfig::parse("{}").unwrap();
        assert_eq!(config, HubConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(matches!(
            HubConfig::parse("server: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn overrides_apply() {
        let vars = BTreeMap::from([
            ("X4_HUB_HOST", "127.0.0.1"),
            ("X4_HUB_PORT", "3001"),
            ("X4_HUB_CONNECTION_TIMEOUT_MS", "5000"),
        ]);
        let mut config = HubConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| (*v).to_owned()))
            .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.connection.timeout_ms, 5000);
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let mut config = HubConfig::default();
        let err = config
            .apply_overrides(|name| (name == "X4_HUB_PORT").then(|| String::from("http")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "X4_HUB_PORT", .. }));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let config = HubConfig::from_file(Path::new("does-not-exist.yaml"));
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }
}
