use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use q3rcon::ClientConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_QUIET_MS: u64 = 180;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub address: String,
    pub password: String,
    pub debug: bool,
    pub timeout_ms: i64,
    pub quiet_ms: i64,
    pub max_packets: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{}: address is empty", .path.display())]
    EmptyAddress { path: PathBuf },
    #[error("{}: address must include port (ip:port)", .path.display())]
    MissingPort { path: PathBuf },
    #[error("{}: password is empty", .path.display())]
    EmptyPassword { path: PathBuf },
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    /// `path` is only used to label errors.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        let mut config: FileConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.address = config.address.trim().to_string();
        let path = path.to_path_buf();

        if config.address.is_empty() {
            return Err(ConfigError::EmptyAddress { path });
        }
        if !config.address.contains(':') {
            return Err(ConfigError::MissingPort { path });
        }
        if config.password.trim().is_empty() {
            return Err(ConfigError::EmptyPassword { path });
        }

        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_debug(self.debug)
            .with_timeout(ms_or_default(self.timeout_ms, DEFAULT_TIMEOUT_MS))
            .with_quiet_window(ms_or_default(self.quiet_ms, DEFAULT_QUIET_MS))
            .with_max_packets(self.max_packets)
    }
}

pub fn ms_or_default(ms: i64, default: u64) -> Duration {
    match u64::try_from(ms) {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => Duration::from_millis(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<FileConfig, ConfigError> {
        FileConfig::from_json(Path::new("config.json"), json)
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"{
                "address": " 10.0.0.5:27960 ",
                "password": "hunter2",
                "debug": true,
                "timeout_ms": 3000,
                "quiet_ms": 250,
                "max_packets": 16
            }"#,
        )
        .unwrap();

        assert_eq!(config.address, "10.0.0.5:27960");
        assert_eq!(config.password, "hunter2");
        assert!(config.debug);

        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_millis(3000));
        assert_eq!(client.quiet_window, Duration::from_millis(250));
        assert_eq!(client.packet_limit(), Some(16));
        assert!(client.debug);
    }

    #[test]
    fn test_missing_timings_use_defaults() {
        let config = parse(r#"{"address": "127.0.0.1:27960", "password": "pw"}"#).unwrap();
        let client = config.client_config();

        assert_eq!(client.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(client.quiet_window, Duration::from_millis(DEFAULT_QUIET_MS));
        assert_eq!(client.packet_limit(), None);
        assert!(!client.debug);
    }

    #[test]
    fn test_validation_errors() {
        let err = parse(r#"{"address": "  ", "password": "pw"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAddress { .. }));
        assert_eq!(err.to_string(), "config.json: address is empty");

        let err = parse(r#"{"password": "pw"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAddress { .. }));

        let err = parse(r#"{"address": "127.0.0.1", "password": "pw"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPort { .. }));

        let err = parse(r#"{"address": "127.0.0.1:27960", "password": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPassword { .. }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("parse config.json: "));
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/q3rcon/config.json");
        let err = FileConfig::load(path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/q3rcon/config.json"));
    }

    #[test]
    fn test_ms_or_default() {
        assert_eq!(ms_or_default(0, 180), Duration::from_millis(180));
        assert_eq!(ms_or_default(-5, 180), Duration::from_millis(180));
        assert_eq!(ms_or_default(42, 180), Duration::from_millis(42));
    }
}
