//! Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pulse_gateway::GatewayConfig;
use pulse_server::ServerConfig;
use pulse_universe::UniverseConfig;

use crate::error::{AppError, AppResult};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain identifier. When set, overrides the chain configured in the
    /// gateway and universe sections so all three always agree.
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub universe: UniverseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Gateway configuration with the top-level chain id applied.
    pub fn gateway_config(&self) -> GatewayConfig {
        let mut config = self.gateway.clone();
        if let Some(chain_id) = &self.chain_id {
            config.chain_id = chain_id.clone();
        }
        config
    }

    /// Universe configuration with the top-level chain id applied.
    pub fn universe_config(&self) -> UniverseConfig {
        let mut config = self.universe.clone();
        if let Some(chain_id) = &self.chain_id {
            config.chain_id = chain_id.clone();
        }
        config
    }
}
