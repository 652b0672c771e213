//! File-based server configuration.
//!
//! # Invariants
//! - A missing config file yields the defaults.
//! - Unknown keys are rejected.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_DATABASE_PATH: &str = "blackbook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_address: String,
    pub database_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_level: blackbook_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file `{}`", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("invalid config file `{}`", path.display()))?;
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        if let Some(log_dir) = &config.log_dir {
            if !log_dir.is_absolute() {
                bail!("log_dir must be an absolute path, got `{}`", log_dir.display());
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blackbook.toml");
        std::fs::write(
            &path,
            "bind_address = \"0.0.0.0:8080\"\ndatabase_path = \"/var/lib/blackbook/db.sqlite3\"\nlog_level = \"warn\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/blackbook/db.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn relative_log_dir_and_unknown_keys_are_rejected() {
        assert!(Config::parse("log_dir = \"logs\"").is_err());
        assert!(Config::parse("port = 3000").is_err());
    }
}
