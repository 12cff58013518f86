//! Configuration management for HashLedger

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// File read when no explicit configuration path is given.
pub const DEFAULT_CONFIG_PATH: &str = "hashledger.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default log filter; `RUST_LOG` still overrides it.
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

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ChainError> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            ChainError::ConfigError(format!(
                "logging.level must be one of off, error, warn, info, debug, trace (got {:?})",
                self.level
            ))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Require the `BlockChain info:` header when loading a plain dump.
    #[serde(default)]
    pub require_header: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Loads the configuration from `path`, or from [`DEFAULT_CONFIG_PATH`].
///
/// A missing default file yields the defaults. A missing explicit file is
/// an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ChainError> {
    let config_str = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            ChainError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?,
        None => match fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        },
    };
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ChainError> {
    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(config_str)?
    };

    // Validate critical values
    config.logging.level_filter()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.format.require_header);
        assert_eq!(config.logging.level_filter().unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_config("[format]\nrequire_header = true\n").unwrap();
        assert!(config.format.require_header);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let config = parse_config("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level_filter().unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_rejects_unknown_level() {
        let result = parse_config("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(parse_config("[format]\nrequire_headers = true\n").is_err());
        assert!(parse_config("not toml at all").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"info\"").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = load_config(Some(missing.as_path()));
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }
}
