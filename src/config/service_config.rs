//! Service configuration — deployment paths and server settings as TOML values
//!
//! Every field has a `Default` matching the paths the service shipped with,
//! ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Root configuration for a railwise deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$RAILWISE_CONFIG` env var
/// 2. `./railwise.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Dataset locations for the inference pipeline
    #[serde(default)]
    pub data: DataConfig,

    /// Fitted model artifact locations
    #[serde(default)]
    pub models: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            models: ModelConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Dataset locations consumed by the inference pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Per-segment feature export (risk model input)
    #[serde(default = "default_segments_path")]
    pub segments_path: String,
    /// Per-sleeper feature export (tamping model input)
    #[serde(default = "default_sleepers_path")]
    pub sleepers_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            segments_path: default_segments_path(),
            sleepers_path: default_sleepers_path(),
        }
    }
}

fn default_segments_path() -> String {
    "./data/segments.csv".to_string()
}

fn default_sleepers_path() -> String {
    "./data/sleepers.csv".to_string()
}

/// Fitted model artifact locations (JSON exports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_risk_model")]
    pub risk_model: String,
    #[serde(default = "default_risk_preprocessor")]
    pub risk_preprocessor: String,
    #[serde(default = "default_tamping_model")]
    pub tamping_model: String,
    #[serde(default = "default_tamping_preprocessor")]
    pub tamping_preprocessor: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            risk_model: default_risk_model(),
            risk_preprocessor: default_risk_preprocessor(),
            tamping_model: default_tamping_model(),
            tamping_preprocessor: default_tamping_preprocessor(),
        }
    }
}

fn default_risk_model() -> String {
    "./models/risk/model.json".to_string()
}

fn default_risk_preprocessor() -> String {
    "./models/risk/preprocessor.json".to_string()
}

fn default_tamping_model() -> String {
    "./models/tamping/model.json".to_string()
}

fn default_tamping_preprocessor() -> String {
    "./models/tamping/preprocessor.json".to_string()
}

impl ServiceConfig {
    /// Load configuration using the documented search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("RAILWISE_CONFIG") {
            match Self::from_file(&path) {
                Ok(config) => {
                    info!(path = %path, "loaded config from RAILWISE_CONFIG");
                    return config;
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "failed to load RAILWISE_CONFIG — falling back");
                }
            }
        }

        if Path::new("railwise.toml").exists() {
            match Self::from_file("railwise.toml") {
                Ok(config) => {
                    info!("loaded config from ./railwise.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "failed to parse ./railwise.toml — using defaults");
                }
            }
        }

        info!("no config file found — using built-in defaults");
        Self::default()
    }

    /// Parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)?;
        config.validate();
        Ok(config)
    }

    /// Emit warnings for suspicious settings. Non-fatal: the service still
    /// starts, but a missing dataset will fail the first inference call.
    pub fn validate(&self) {
        for (label, path) in [
            ("data.segments_path", &self.data.segments_path),
            ("data.sleepers_path", &self.data.sleepers_path),
            ("models.risk_model", &self.models.risk_model),
            ("models.risk_preprocessor", &self.models.risk_preprocessor),
            ("models.tamping_model", &self.models.tamping_model),
            (
                "models.tamping_preprocessor",
                &self.models.tamping_preprocessor,
            ),
        ] {
            if !Path::new(path).exists() {
                warn!(key = label, path = %path, "configured path does not exist");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_shipped_paths() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.data.segments_path, "./data/segments.csv");
        assert_eq!(config.models.risk_model, "./models/risk/model.json");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server]\naddr = \"127.0.0.1:9000\"\n")
            .unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.addr, "127.0.0.1:9000");
        // Unspecified sections keep their defaults
        assert_eq!(config.data.sleepers_path, "./data/sleepers.csv");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"server = \"not a table\"").unwrap();
        assert!(ServiceConfig::from_file(file.path()).is_err());
    }
}
