//! Configuration module for Heirloom.
//!
//! All service endpoints and the contract identity live in one
//! [`ServiceConfig`] value, loaded once at startup and passed explicitly
//! into the session constructor. There is no ambient global configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is missing after file and environment resolution.
    #[error("missing required config value: {0}")]
    Missing(&'static str),
}

fn default_indexer_uri() -> String {
    "http://127.0.0.1:8088/api/v1/query".to_string()
}

fn default_indexer_ws_uri() -> String {
    "ws://127.0.0.1:8088/api/v1/watch".to_string()
}

fn default_wallet_uri() -> String {
    "http://127.0.0.1:9944/".to_string()
}

fn default_proof_artifact_path() -> String {
    "/zk/inheritance".to_string()
}

/// Service endpoints and contract identity for a Heirloom session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address of the deployed inheritance contract.
    #[serde(default)]
    pub contract_address: String,

    /// Indexer HTTP endpoint for state queries.
    #[serde(default = "default_indexer_uri")]
    pub indexer_uri: String,

    /// Indexer WebSocket endpoint for finality watching.
    #[serde(default = "default_indexer_ws_uri")]
    pub indexer_ws_uri: String,

    /// Wallet service RPC endpoint.
    #[serde(default = "default_wallet_uri")]
    pub wallet_uri: String,

    /// Base path of the proof artifacts served alongside the application.
    #[serde(default = "default_proof_artifact_path")]
    pub proof_artifact_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            indexer_uri: default_indexer_uri(),
            indexer_ws_uri: default_indexer_ws_uri(),
            wallet_uri: default_wallet_uri(),
            proof_artifact_path: default_proof_artifact_path(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `HEIRLOOM_*` environment overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// no contract address is configured anywhere.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `HEIRLOOM_*` environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 5] = [
            ("HEIRLOOM_CONTRACT_ADDRESS", &mut self.contract_address),
            ("HEIRLOOM_INDEXER_URI", &mut self.indexer_uri),
            ("HEIRLOOM_INDEXER_WS_URI", &mut self.indexer_ws_uri),
            ("HEIRLOOM_WALLET_URI", &mut self.wallet_uri),
            ("HEIRLOOM_PROOF_ARTIFACTS", &mut self.proof_artifact_path),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    /// Check that every required value is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the contract address is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_address.is_empty() {
            return Err(ConfigError::Missing("contract_address"));
        }
        Ok(())
    }
}
