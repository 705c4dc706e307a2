use app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

mod config_loader;
pub use config_loader::*;

/// The configuration system uses a single JSON configuration file with an
/// embedded default, plus an optional `GATEWAY_CONFIG` path override.
///
/// This module provides the standalone configuration types handed to the
/// assembler and the server; the full file layout lives in `config_loader`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub port: u16,
    pub address: String,
}

impl Server {
    pub fn new(address: String, port: u16) -> Self {
        Self { port, address }
    }

    // Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        // Validate port
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid server port: '0' is not a valid port number"
            )));
        }

        // Validate address (basic check)
        if self.address.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Server address cannot be empty"
            )));
        }

        Ok(())
    }
}

/// Mocking policy handed to the gateway assembler.
///
/// `enabled` is the master switch. With `mock_entire_schema` set, every
/// field is mocked even when a real resolver is registered; unset, only
/// fields without a registered resolver fall back to mock values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockOptions {
    pub enabled: bool,
    pub mock_entire_schema: bool,
    pub seed: Option<u64>,
    pub list_length: usize,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            mock_entire_schema: false,
            seed: None,
            list_length: 2,
        }
    }
}

impl MockOptions {
    pub fn validate(&self) -> AppResult<()> {
        if self.list_length == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Mock list length must be at least 1"
            )));
        }

        Ok(())
    }

    /// Whether a field with a registered resolver should still be mocked.
    pub fn overrides_resolvers(&self) -> bool {
        self.enabled && self.mock_entire_schema
    }
}

/// Converts from the full AppConfig to the standalone Server config
impl From<&AppConfig> for Server {
    fn from(config: &AppConfig) -> Self {
        Self {
            port: config.server.port,
            address: config.server.host.clone(),
        }
    }
}

/// Converts from the full AppConfig to the standalone MockOptions
impl From<&AppConfig> for MockOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            enabled: config.gateway.mocks.enabled,
            mock_entire_schema: config.gateway.mocks.mock_entire_schema,
            seed: config.gateway.mocks.seed,
            list_length: config.gateway.mocks.list_length,
        }
    }
}
