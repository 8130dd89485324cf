//! Configuration file support for swmgmt-routed
//!
//! Loads and validates daemon configuration from TOML files.
//! Default location: /etc/swmgmt/routed.toml

use crate::error::{Result, RoutedError};
use crate::route::{RouteManagerConfig, DEFAULT_CACHE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use swmgmt_asic::{SoftAsicConfig, Unit};
use tracing::warn;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/swmgmt/routed.toml";

/// RPC server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the route management service listens on
    #[serde(default = "default_listen")]
    pub listen: String,
}

/// Forwarding hardware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsicConfig {
    /// ASIC unit number
    #[serde(default)]
    pub unit: i32,

    /// L3 route table entries
    #[serde(default = "default_route_table_size")]
    pub route_table_size: usize,

    /// L3 host table entries
    #[serde(default = "default_host_table_size")]
    pub host_table_size: usize,
}

/// Route cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Route slots preallocated at start-up
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

/// Complete swmgmt-routed configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutedConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub asic: AsicConfig,

    #[serde(default)]
    pub routes: RoutesConfig,
}

fn default_listen() -> String {
    "0.0.0.0:50057".to_string()
}

fn default_route_table_size() -> usize {
    SoftAsicConfig::default().route_table_size
}

fn default_host_table_size() -> usize {
    SoftAsicConfig::default().host_table_size
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for AsicConfig {
    fn default() -> Self {
        Self {
            unit: 0,
            route_table_size: default_route_table_size(),
            host_table_size: default_host_table_size(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl RoutedConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                RoutedError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(RoutedError::Io(e)),
        }
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server.listen.parse().map_err(|e| {
            RoutedError::Configuration(format!(
                "invalid listen address {}: {}",
                self.server.listen, e
            ))
        })
    }

    pub fn unit(&self) -> Unit {
        Unit::new(self.asic.unit)
    }

    pub fn soft_asic(&self) -> SoftAsicConfig {
        SoftAsicConfig {
            route_table_size: self.asic.route_table_size,
            host_table_size: self.asic.host_table_size,
        }
    }

    pub fn route_manager(&self) -> RouteManagerConfig {
        RouteManagerConfig {
            cache_capacity: self.routes.cache_capacity,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.asic.unit < 0 {
            return Err(RoutedError::Configuration(
                "asic unit must be >= 0".to_string(),
            ));
        }

        // The default route takes one slot.
        if self.asic.route_table_size == 0 {
            return Err(RoutedError::Configuration(
                "route_table_size must be > 0".to_string(),
            ));
        }

        if self.routes.cache_capacity > self.asic.route_table_size {
            warn!(
                cache_capacity = self.routes.cache_capacity,
                route_table_size = self.asic.route_table_size,
                "cache_capacity exceeds route table size"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RoutedConfig::default();
        assert_eq!(config.server.listen, "0.0.0.0:50057");
        assert_eq!(config.asic.unit, 0);
        assert_eq!(config.routes.cache_capacity, 150_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:6000"

[asic]
host_table_size = 64
"#;
        let config: RoutedConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:6000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.asic.host_table_size, 64);
        // Unspecified values should use defaults
        assert_eq!(config.asic.route_table_size, 163_840);
        assert_eq!(config.routes.cache_capacity, 150_000);
    }

    #[test]
    fn test_validate_invalid_listen() {
        let mut config = RoutedConfig::default();
        config.server.listen = "not-an-address".to_string();
        assert!(matches!(
            config.validate(),
            Err(RoutedError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_zero_route_table() {
        let mut config = RoutedConfig::default();
        config.asic.route_table_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_unit() {
        let mut config = RoutedConfig::default();
        config.asic.unit = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_nonexistent_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RoutedConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:50057");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routes]\ncache_capacity = 1024\n\n[asic]\nunit = 1").unwrap();

        let config = RoutedConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.route_manager().cache_capacity, 1024);
        assert_eq!(config.unit(), Unit::new(1));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routes\ncache_capacity = ").unwrap();

        let err = RoutedConfig::load_or_default(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
