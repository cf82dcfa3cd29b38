//! Runtime configuration.
//!
//! Settings come from an optional TOML file, located in this order:
//! 1. `FITOX_CONFIG` environment variable.
//! 2. `~/.config/fitox/config.toml` (on Linux).
//!
//! A missing file is not an error; every key has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::responder::FallbackMode;

/// Application settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding `tasks.json`, `chat.json` and `user.json`.
    pub data_dir: Option<PathBuf>,
    /// What the coach says when no topic matches.
    pub fallback: FallbackMode,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the config file, or defaults if there is none.
    pub fn load() -> Result<Config, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Config::from_file(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the data directory.
    ///
    /// The path is determined in the following order:
    /// 1. `FITOX_DATA_DIR` environment variable.
    /// 2. `data_dir` from the config file.
    /// 3. `~/.local/share/fitox` (on Linux).
    /// 4. `./.fitox` (fallback).
    pub fn data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("FITOX_DATA_DIR") {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match dirs::data_local_dir() {
            Some(mut p) => {
                p.push("fitox");
                p
            }
            None => PathBuf::from(".fitox"),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FITOX_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|mut p| {
        p.push("fitox");
        p.push("config.toml");
        p
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let cfg: Config = toml::from_str(
            r#"
            data_dir = "/tmp/fitox"
            fallback = "menu"
            log_level = "fitox=debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/tmp/fitox")));
        assert_eq!(cfg.fallback, FallbackMode::Menu);
        assert_eq!(cfg.log_level.as_deref(), Some("fitox=debug"));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.fallback, FallbackMode::Random);
    }

    #[test]
    fn rejects_unknown_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fallback = \"silence\"").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
