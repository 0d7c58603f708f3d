use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Layered configuration: `runbridge.toml` if present, then
    /// `RUNBRIDGE_`-prefixed environment variables on top.
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Toml::file("runbridge.toml"))
            .merge(Env::prefixed("RUNBRIDGE_"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load configuration: {e}")))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_database_path() -> PathBuf {
    PathBuf::from("runbridge.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_sources() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_path, PathBuf::from("runbridge.db"));
    }
}
