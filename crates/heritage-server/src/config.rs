//! Server configuration, parsed from TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use heritage_core::{Address, LivenessConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// General server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Registry identity
    #[serde(default)]
    pub registry: RegistrySection,

    /// Heartbeat thresholds for the monitor cycle
    #[serde(default)]
    pub liveness: LivenessConfig,
}

/// General server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Data directory (ledger state file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Check interval in seconds (default: 1 hour)
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            check_interval_secs: default_check_interval(),
            log_level: default_log_level(),
        }
    }
}

/// Registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Account the registry spends allowances as (0x-prefixed hex)
    #[serde(default = "default_registry_address")]
    pub address: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            address: default_registry_address(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

fn default_check_interval() -> u64 {
    3600 // 1 hour
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_registry_address() -> String {
    "0x00000000000000000000000000000000000000ff".to_string()
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ServerConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `HERITAGE_DATA_DIR`
    /// - `HERITAGE_CHECK_INTERVAL`
    /// - `HERITAGE_LOG_LEVEL`
    /// - `HERITAGE_REGISTRY_ADDRESS`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HERITAGE_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HERITAGE_CHECK_INTERVAL") {
            if let Ok(secs) = v.parse::<u64>() {
                self.server.check_interval_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("HERITAGE_LOG_LEVEL") {
            self.server.log_level = v;
        }
        if let Ok(v) = std::env::var("HERITAGE_REGISTRY_ADDRESS") {
            self.registry.address = v;
        }
    }

    /// Path of the persisted ledger state.
    pub fn state_path(&self) -> PathBuf {
        self.server.data_dir.join("ledger_state.json")
    }

    /// Parse the registry address.
    pub fn registry_address(&self) -> Result<Address> {
        Address::from_str(&self.registry.address)
            .with_context(|| format!("Invalid registry.address: {}", self.registry.address))
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let address = self.registry_address()?;
        anyhow::ensure!(!address.is_zero(), "registry.address must not be zero");

        // Check interval must be at least 60 seconds
        anyhow::ensure!(
            self.server.check_interval_secs >= 60,
            "server.check_interval_secs must be >= 60"
        );

        self.liveness
            .validate()
            .context("Invalid [liveness] thresholds")?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
