//! Configuration module
//!
//! Settings are read from a TOML file; every section has defaults so the
//! service also starts with no file at all. The path can be overridden with
//! the RENTAL_CONFIG environment variable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file location (~/.config/altamar-rental/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("altamar-rental")
        .join("config.toml")
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub sweep: SweepSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file path; switch the URL scheme for PostgreSQL
    pub path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "./rental.db".to_string(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    /// Seconds between status sweep passes
    pub interval_secs: u64,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// tracing filter, e.g. "info" or "altamar_rental=debug"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.sweep.interval_secs, 3600);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.database.connection_url().starts_with("sqlite://"));
    }

    #[test]
    fn partial_file_falls_back_per_section() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [sweep]
            interval_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sweep.interval_secs, 600);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn full_file_parses() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [database]
            path = "/var/lib/rental/rental.db"

            [sweep]
            interval_secs = 900

            [logging]
            level = "altamar_rental=debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database.path, "/var/lib/rental/rental.db");
        assert_eq!(cfg.sweep.interval_secs, 900);
        assert_eq!(cfg.logging.level, "altamar_rental=debug");
    }
}
