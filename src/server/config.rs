//! Configuration loading for bifrostd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.bifrost/config.toml` (user)
//! 3. `/etc/bifrost/config.toml` (system)
//! 4. built-in defaults
//!
//! Individual addresses can be overridden by CLI flags and environment
//! variables (see `bifrostd --help`), so the daemon runs without a file.

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::client::RetryConfig;
use crate::error::{BifrostError, Result};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// RPC listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// Address the gRPC endpoint binds (default: 127.0.0.1:50051).
    #[serde(default = "default_rpc_address")]
    pub address: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: default_rpc_address(),
        }
    }
}

fn default_rpc_address() -> String {
    "127.0.0.1:50051".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Address the transcoding gateway binds (default: 127.0.0.1:8081).
    #[serde(default = "default_http_address")]
    pub address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_http_address(),
        }
    }
}

fn default_http_address() -> String {
    "127.0.0.1:8081".to_string()
}

/// Gateway-to-endpoint connection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Dial target for the RPC endpoint. Defaults to the endpoint's
    /// actual bound address, so it only needs setting when the endpoint
    /// runs on another host.
    #[serde(default)]
    pub rpc_target: Option<String>,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Per-request deadline in seconds, propagated to the RPC call (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Maximum accepted HTTP body size in bytes (default: 1 MiB).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; missing is an error)
    /// 2. `~/.bifrost/config.toml`
    /// 3. `/etc/bifrost/config.toml`
    /// 4. built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Config::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            BifrostError::Configuration(format!("failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            BifrostError::Configuration(format!("failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(BifrostError::Configuration(format!(
                "config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".bifrost").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/bifrost/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Parse the RPC listen address.
    pub fn rpc_addr(&self) -> Result<SocketAddr> {
        self.rpc.address.parse().map_err(|e| {
            BifrostError::Configuration(format!("invalid rpc address {:?}: {e}", self.rpc.address))
        })
    }

    /// Parse the HTTP listen address.
    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.http.address.parse().map_err(|e| {
            BifrostError::Configuration(format!(
                "invalid http address {:?}: {e}",
                self.http.address
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.rpc.address, "127.0.0.1:50051");
        assert_eq!(config.http.address, "127.0.0.1:8081");
        assert!(config.gateway.rpc_target.is_none());
        assert_eq!(config.limits.request_timeout_secs, 30);
        assert_eq!(config.limits.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [rpc]
            address = "0.0.0.0:50051"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.rpc.address, "0.0.0.0:50051");
        // Defaults preserved
        assert_eq!(config.http.address, "127.0.0.1:8081");
        assert_eq!(config.limits.request_timeout_secs, 30);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [rpc]
            address = "127.0.0.1:50051"

            [http]
            address = "0.0.0.0:8081"

            [gateway]
            rpc_target = "http://10.0.0.7:50051"

            [gateway.retry]
            max_attempts = 8
            initial_delay_ms = 100
            max_delay_ms = 2000

            [limits]
            request_timeout_secs = 10
            max_body_bytes = 65536
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.http.address, "0.0.0.0:8081");
        assert_eq!(
            config.gateway.rpc_target.as_deref(),
            Some("http://10.0.0.7:50051")
        );
        assert_eq!(config.gateway.retry.max_attempts, 8);
        assert_eq!(config.gateway.retry.initial_delay_ms, 100);
        assert_eq!(config.limits.request_timeout_secs, 10);
        assert_eq!(config.limits.max_body_bytes, 65536);
    }

    #[test]
    fn load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rpc]\naddress = \"127.0.0.1:7000\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.rpc.address, "127.0.0.1:7000");
    }

    #[test]
    fn explicit_path_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("config file not found"));
    }

    #[test]
    fn invalid_address_is_configuration_error() {
        let config: Config = toml::from_str("[rpc]\naddress = \"not-an-address\"").unwrap();
        assert!(config.rpc_addr().is_err());
    }
}
