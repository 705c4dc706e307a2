use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info, warn};

use app_error::{AppError, AppResult};

/// Complete application configuration loaded from a JSON file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub gateway: GatewaySettings,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub body_limit: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SecurityConfig {
    pub cors: CorsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewaySettings {
    /// Overrides the embedded schema document when set
    #[serde(default)]
    pub schema_path: Option<String>,
    #[serde(default = "default_playground")]
    pub playground: bool,
    #[serde(default)]
    pub mocks: MockSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MockSettings {
    #[serde(default = "default_mocks_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mock_entire_schema: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_list_length")]
    pub list_length: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitoringConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_playground() -> bool {
    true
}

fn default_mocks_enabled() -> bool {
    true
}

fn default_list_length() -> usize {
    2
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            enabled: default_mocks_enabled(),
            mock_entire_schema: false,
            seed: None,
            list_length: default_list_length(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
                timeout_secs: 30,
                body_limit: 2 * 1024 * 1024,
            },
            security: SecurityConfig {
                cors: CorsConfig {
                    allowed_origins: vec!["*".to_string()],
                    allowed_methods: vec!["GET".to_string(), "POST".to_string()],
                    allowed_headers: vec!["content-type".to_string()],
                },
            },
            gateway: GatewaySettings {
                schema_path: None,
                playground: true,
                mocks: MockSettings::default(),
            },
            monitoring: MonitoringConfig {
                logging: LoggingConfig {
                    level: "info".to_string(),
                    format: "compact".to_string(),
                },
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        debug!("Configuration loaded from file");
        Ok(config)
    }

    /// Load configuration from the `GATEWAY_CONFIG` override or the
    /// embedded default
    pub fn load() -> AppResult<Self> {
        // .env is optional; only the override variable is read from it
        dotenv::dotenv().ok();

        let config = if let Ok(path) = std::env::var("GATEWAY_CONFIG") {
            match Self::from_file(&path) {
                Ok(conf) => {
                    info!("Loaded configuration from: {}", path);
                    conf
                }
                Err(e) => {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "Failed to load config file '{}': {}",
                        path,
                        e
                    )));
                }
            }
        } else {
            let config_content = include_str!("../res/app-config.json");

            match serde_json::from_str::<AppConfig>(config_content) {
                Ok(conf) => {
                    info!("Loaded embedded configuration for: {}", conf.environment);
                    conf
                }
                Err(e) => {
                    warn!(
                        "Failed to parse embedded config: {}. Using default configuration.",
                        e
                    );
                    Self::default()
                }
            }
        };

        // Validate the config
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("Server port '0' is not a valid port number".to_string());
        }

        if self.server.body_limit == 0 {
            errors.push("Server body limit cannot be zero".to_string());
        }

        if self.gateway.mocks.list_length == 0 {
            errors.push("Mock list length must be at least 1".to_string());
        }

        if let Some(path) = &self.gateway.schema_path {
            if !Path::new(path).exists() {
                errors.push(format!("Schema document '{}' does not exist", path));
            }
        }

        match self.monitoring.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => errors.push(format!("Unknown log level '{}'", other)),
        }

        if !errors.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid gateway configuration: {}",
                errors.join(", ")
            )));
        }

        Ok(())
    }

    /// Read the schema document named by the configuration, if any
    pub fn schema_document(&self) -> AppResult<Option<String>> {
        match &self.gateway.schema_path {
            Some(path) => {
                let sdl = fs::read_to_string(path).map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Failed to read schema document '{}': {}",
                        path,
                        e
                    ))
                })?;
                Ok(Some(sdl))
            }
            None => Ok(None),
        }
    }
}
