//! Configuration module for dsforum.

use serde::Deserialize;
use std::path::Path;

use crate::auth::validation::Rules;
use crate::{ForumError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/forum.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Site information configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the forum, shown in the page header and titles.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Tagline shown under the forum name.
    #[serde(default = "default_site_tagline")]
    pub tagline: String,
    /// Threads shown per page on category listings.
    #[serde(default = "default_threads_per_page")]
    pub threads_per_page: i64,
}

fn default_site_name() -> String {
    "DoppelServe-Forum".to_string()
}

fn default_site_tagline() -> String {
    "by doppelserve.com".to_string()
}

fn default_threads_per_page() -> i64 {
    10
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            tagline: default_site_tagline(),
            threads_per_page: default_threads_per_page(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/forum.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Web server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Input validation rules.
    #[serde(default)]
    pub rules: Rules,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ForumError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "data/forum.db");
        assert_eq!(config.site.name, "DoppelServe-Forum");
        assert_eq!(config.site.threads_per_page, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[site]
name = "Test Forum"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.site.name, "Test Forum");
        assert_eq!(config.site.tagline, "by doppelserve.com");
    }

    #[test]
    fn test_parse_rules_section() {
        let toml = r#"
[rules]
username_min = 2
password_complexity = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.rules.username_min, 2);
        assert!(!config.rules.password_complexity);
        // Untouched values keep their defaults
        assert_eq!(config.rules.username_max, 16);
        assert_eq!(config.rules.body_min, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("does/not/exist.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9999\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9999);
    }
}
