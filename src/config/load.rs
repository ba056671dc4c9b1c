use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, error, warn};

use super::AppConfig;
use crate::errors::{ExporterError, Result};

impl AppConfig {
    /// Load configuration from TOML file with environment variable fallback
    pub fn load(config_path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(config_path);
        config.override_with_env();
        config
    }

    /// Load configuration from TOML file
    fn load_from_file(config_path: Option<&str>) -> Self {
        let default_paths = [
            "exporter.toml",
            "config.toml",
            "/etc/asterisk-exporter/config.toml",
        ];
        let candidates: Vec<&str> = match config_path {
            Some(path) => vec![path],
            None => default_paths.to_vec(),
        };

        for path in candidates {
            if Path::new(path).exists() {
                debug!("Loading config from: {}", path);
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<AppConfig>(&content) {
                        Ok(config) => {
                            debug!("Successfully loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Override configuration with environment variables
    fn override_with_env(&mut self) {
        // Server config
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            } else {
                error!("Invalid SERVER_PORT: {}", port);
            }
        }

        // Auth config
        if let Ok(username) = env::var("METRICS_USERNAME") {
            self.auth.username = username;
        }
        if let Ok(password) = env::var("METRICS_PASSWORD") {
            self.auth.password = password;
        }

        // Collector config
        if let Ok(interval) = env::var("COLLECT_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.collector.interval_secs = secs;
            } else {
                error!("Invalid COLLECT_INTERVAL_SECS: {}", interval);
            }
        }
        if let Ok(timeout) = env::var("COMMAND_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.collector.command_timeout_secs = secs;
            } else {
                error!("Invalid COMMAND_TIMEOUT_SECS: {}", timeout);
            }
        }
        if let Ok(binary) = env::var("ASTERISK_BINARY") {
            self.collector.asterisk_binary = binary;
        }

        // Logging config
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    /// Startup sanity checks. Empty credentials disable nothing, they just
    /// deserve a loud warning.
    pub fn validate(&self) -> Result<()> {
        if self.collector.interval_secs == 0 {
            return Err(ExporterError::validation(
                "collector.interval_secs must be at least 1",
            ));
        }
        if self.collector.command_timeout_secs >= self.collector.interval_secs {
            warn!(
                "command_timeout_secs ({}) is not below interval_secs ({}); a hung \
                 command will stall every subsequent step of that cycle",
                self.collector.command_timeout_secs, self.collector.interval_secs
            );
        }
        if self.auth.password.is_empty() {
            warn!("METRICS_PASSWORD is not set; /metrics will reject every request");
        }
        Ok(())
    }
}
