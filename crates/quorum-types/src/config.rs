//! Configuration management for quorum deployments
//!
//! This module centralizes the knobs the deployment tooling passes to a
//! wallet instance: the execution-environment header (confidential flag,
//! gas limit) and the owner bootstrap list.

use crate::address::AccAddress;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    #[error("Home directory not found")]
    HomeDirectoryNotFound,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub deploy: DeployConfig,
    pub wallet: WalletConfig,
}

/// Execution-environment header for the deployment
///
/// The engine stores these values and forwards them opaquely; whether
/// call data is actually encrypted is the environment's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Whether call data and state are hidden from outside observers
    pub confidential: bool,
    /// Resource budget for outbound calls
    pub gas_limit: u64,
}

/// Owner bootstrap for a wallet instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Owner addresses as hex strings
    pub owners: Vec<String>,
    /// Confirmation quorum
    pub required: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            deploy: DeployConfig {
                confidential: false,
                gas_limit: 0xF42400, // 16,000,000
            },
            wallet: WalletConfig {
                owners: vec![],
                required: 1,
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to default if file doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::default_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::ReadError(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::ReadError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirectoryNotFound)?;
        Ok(home.join(".quorum").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deploy.gas_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "Gas limit must be non-zero".to_string(),
            ));
        }

        if self.wallet.required == 0 {
            return Err(ConfigError::InvalidValue(
                "Required confirmations must be at least 1".to_string(),
            ));
        }

        if !self.wallet.owners.is_empty()
            && self.wallet.required as usize > self.wallet.owners.len()
        {
            return Err(ConfigError::InvalidValue(format!(
                "Required confirmations ({}) exceed owner count ({})",
                self.wallet.required,
                self.wallet.owners.len()
            )));
        }

        // Owner strings must parse and must be unique
        let addrs = self.owner_addresses()?;
        let mut seen = std::collections::BTreeSet::new();
        for addr in &addrs {
            if !seen.insert(*addr) {
                return Err(ConfigError::InvalidValue(format!(
                    "Duplicate owner address: {addr}"
                )));
            }
        }

        Ok(())
    }

    /// Parse the bootstrap owner list into addresses
    pub fn owner_addresses(&self) -> Result<Vec<AccAddress>, ConfigError> {
        self.wallet
            .owners
            .iter()
            .map(|s| {
                AccAddress::from_hex(s).map_err(|e| {
                    ConfigError::InvalidValue(format!("Invalid owner address '{s}': {e}"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const OWNER_A: &str = "b8b3666d8fea887d97ab54f571b8e5020c5c8b58";
    const OWNER_B: &str = "ff8c7955506c8f6ae9df7efbc3a26cc9105e1797";

    fn two_owner_config() -> Config {
        let mut config = Config::default();
        config.wallet.owners = vec![OWNER_A.to_string(), OWNER_B.to_string()];
        config.wallet.required = 2;
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.deploy.gas_limit, 0xF42400);
        assert!(!config.deploy.confidential);
        assert_eq!(config.wallet.required, 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = two_owner_config();
        assert!(config.validate().is_ok());

        config.deploy.gas_limit = 0;
        assert!(config.validate().is_err());

        config = two_owner_config();
        config.wallet.required = 3;
        assert!(config.validate().is_err());

        config = two_owner_config();
        config.wallet.owners = vec![OWNER_A.to_string(), OWNER_A.to_string()];
        assert!(config.validate().is_err());

        config = two_owner_config();
        config.wallet.owners = vec!["zz".to_string()];
        config.wallet.required = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_owner_addresses() {
        let config = two_owner_config();
        let addrs = config.owner_addresses().unwrap();
        assert_eq!(addrs.len(), 2);
        assert_eq!(addrs[0].to_hex(), format!("0x{OWNER_A}"));
    }

    #[test]
    fn test_config_save_load() {
        let config = two_owner_config();
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().to_path_buf();

        let content = toml::to_string_pretty(&config).unwrap();
        std::fs::write(&temp_path, content).unwrap();

        let loaded = Config::load_from_file(&temp_path).unwrap();
        assert_eq!(loaded.wallet.owners, config.wallet.owners);
        assert_eq!(loaded.deploy.gas_limit, config.deploy.gas_limit);
    }
}
