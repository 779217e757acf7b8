use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverSettings;
use super::server::ServerConfig;

const LOCAL_CONFIG: &str = "ferrous-recursor.toml";
const SYSTEM_CONFIG: &str = "/etc/ferrous-recursor/config.toml";

/// Main configuration structure for Ferrous Recursor
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Iterative resolution configuration
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-recursor.toml in current directory
    /// 3. /etc/ferrous-recursor/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::get_config_path() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(path) = overrides.root_hints_path {
            self.resolver.root_hints_path = Some(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if self.resolver.nameserver_port == 0 {
            return Err(ConfigError::Validation(
                "Name server port cannot be 0".to_string(),
            ));
        }
        if self.resolver.max_recursion_depth == 0 {
            return Err(ConfigError::Validation(
                "max_recursion_depth must be at least 1".to_string(),
            ));
        }
        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub root_hints_path: Option<String>,
}
