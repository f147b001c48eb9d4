// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

/// Optional static host for the browser UI; omitting the section disables
/// it entirely.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub assets: Option<AssetsConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("explanations.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.data.csv_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.csv_path must not be empty".to_string(),
            ));
        }
        if let Some(assets) = &self.assets {
            if assets.root.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "assets.root must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| {
        ConfigError::LoadError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            err
        ))
    })?;
    let config: Config = serde_yaml::from_str(&content).map_err(|err| {
        ConfigError::LoadError(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            err
        ))
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads the config file, falling back to defaults when it does not exist.
/// A present-but-broken file is still an error so typos never silently
/// drop a setting.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_loopback_port_8000() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.csv_path, PathBuf::from("explanations.csv"));
        assert!(config.assets.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: Config = serde_yaml::from_str("server:\n  port: 9001\n").expect("parse");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_yaml_round_trips() {
        let yaml = "\
server:
  host: 0.0.0.0
  port: 8080
data:
  csv_path: /srv/data/explanations.csv
assets:
  root: /srv/assets
logging:
  level: debug
";
        let config: Config = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.data.csv_path,
            PathBuf::from("/srv/data/explanations.csv")
        );
        assert_eq!(
            config.assets.as_ref().map(|a| a.root.clone()),
            Some(PathBuf::from("/srv/assets"))
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_host_fails_validation() {
        let config: Config = serde_yaml::from_str("server:\n  host: \"  \"\n").expect("parse");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = load_or_default(&dir.path().join("config.yaml")).expect("defaults");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "server: [not, a, mapping]").expect("write");
        assert!(matches!(
            load_or_default(&path),
            Err(ConfigError::LoadError(_))
        ));
    }
}
