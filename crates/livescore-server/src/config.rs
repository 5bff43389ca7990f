//! Server configuration.
//!
//! Settings are read from `livescore.toml` in the working directory when
//! the file exists, with environment variables taking precedence for the
//! values that differ between deployments.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use livescore_core::HubConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse the config file.
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configured listen address is not a valid socket address.
    #[error("Invalid listen address: {0}")]
    InvalidAddr(String),

    /// No admin token was configured, so every mutating request would
    /// be refused.
    #[error("No admin token configured; set admin_token in livescore.toml or LIVESCORE_ADMIN_TOKEN")]
    MissingAdminToken,

    /// The heartbeat interval is zero, so dead connections would never
    /// be noticed.
    #[error("heartbeat_secs must be greater than zero")]
    ZeroHeartbeat,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Shared secret expected in the `x-admin-token` request header.
    #[serde(default)]
    pub admin_token: String,

    /// Seconds between keep-alive sweeps on the event stream.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Queued events per subscriber before one counts as unresponsive.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_heartbeat_secs() -> u64 {
    5
}

fn default_subscriber_buffer() -> usize {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            admin_token: String::new(),
            heartbeat_secs: default_heartbeat_secs(),
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `livescore.toml`, falling back to
    /// defaults when the file does not exist, then applies the
    /// `LIVESCORE_ADDR` and `LIVESCORE_ADMIN_TOKEN` environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Self::config_path())?;
        if let Ok(addr) = std::env::var("LIVESCORE_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(token) = std::env::var("LIVESCORE_ADMIN_TOKEN") {
            config.admin_token = token;
        }
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the config file relative to the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("livescore.toml")
    }

    /// Checks that the configuration is usable at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_token.is_empty() {
            return Err(ConfigError::MissingAdminToken);
        }
        if self.heartbeat_secs == 0 {
            return Err(ConfigError::ZeroHeartbeat);
        }
        Ok(())
    }

    /// The listen address parsed as a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(self.listen_addr.clone()))
    }

    /// Hub settings derived from this configuration.
    pub fn hub_config(&self) -> HubConfig {
        HubConfig::default()
            .heartbeat_interval(Duration::from_secs(self.heartbeat_secs))
            .subscriber_buffer(self.subscriber_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:5000");
        assert_eq!(config.admin_token, "");
        assert_eq!(config.heartbeat_secs, 5);
        assert_eq!(config.subscriber_buffer, 32);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            listen_addr = "0.0.0.0:8080"
            admin_token = "hunter2"
            heartbeat_secs = 10
            subscriber_buffer = 64
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.admin_token, "hunter2");
        assert_eq!(config.heartbeat_secs, 10);
        assert_eq!(config.subscriber_buffer, 64);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let toml_str = r#"
            admin_token = "hunter2"
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:5000");
        assert_eq!(config.admin_token, "hunter2");
        assert_eq!(config.heartbeat_secs, 5);
        assert_eq!(config.subscriber_buffer, 32);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listen_addr, ServerConfig::default().listen_addr);
    }

    #[test]
    fn test_validate_rejects_missing_admin_token() {
        let config = ServerConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAdminToken)
        ));
    }

    #[test]
    fn test_validate_accepts_configured_token() {
        let config = ServerConfig {
            admin_token: "hunter2".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_heartbeat() {
        let config = ServerConfig {
            admin_token: "hunter2".to_string(),
            heartbeat_secs: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroHeartbeat)));
    }

    #[test]
    fn test_socket_addr_parses_listen_addr() {
        let config = ServerConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_socket_addr_rejects_garbage() {
        let config = ServerConfig {
            listen_addr: "not-an-address".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidAddr(_))
        ));
    }

    #[test]
    fn test_hub_config_carries_settings() {
        let config = ServerConfig {
            heartbeat_secs: 2,
            subscriber_buffer: 8,
            ..ServerConfig::default()
        };
        let hub_config = config.hub_config();
        assert_eq!(hub_config.heartbeat_interval, Duration::from_secs(2));
        assert_eq!(hub_config.subscriber_buffer, 8);
    }
}
