//! Application configuration
//!
//! Configuration is loaded from a TOML file (if one exists), then overridden
//! by environment variables, so containerized deployments can run without a
//! config file at all.

mod load;

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub collector: CollectorConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            // Conventional asterisk exporter port
            port: 9255,
        }
    }
}

/// Basic auth credentials for the /metrics endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "metrics".to_string(),
            password: String::new(),
        }
    }
}

/// Collector loop settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Seconds between collection cycles
    pub interval_secs: u64,
    /// Per-command execution budget; must stay below the interval
    pub command_timeout_secs: u64,
    /// Path to the asterisk binary used to build the default command set
    pub asterisk_binary: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            command_timeout_secs: 5,
            asterisk_binary: "/usr/sbin/asterisk".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive string, e.g. "info" or "asterisk_exporter=debug"
    pub level: String,
    /// "text" or "json"
    pub format: String,
    /// Optional log file; empty means stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}
