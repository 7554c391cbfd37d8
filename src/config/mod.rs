// src/config/mod.rs
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::compat::CompatibilityMap;
use crate::health::ServiceIdentity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("service name must not be empty")]
    MissingName,

    #[error("service version must not be empty")]
    MissingVersion,

    #[error("cannot resolve listen address {host}:{port}")]
    UnresolvableAddress { host: String, port: u16 },
}

/// Construction-time configuration for one service instance.
///
/// The declared range expressions are deliberately NOT validated here;
/// validity is checked lazily on every health computation so a bad entry
/// shows up in the health report instead of preventing startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub compatible_with: CompatibilityMap,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9800
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::MissingVersion);
        }
        Ok(())
    }

    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::UnresolvableAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;

    let config: Config = if path.extension().and_then(|s| s.to_str()) == Some("yaml")
        || path.extension().and_then(|s| s.to_str()) == Some("yml") {
        serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(&contents).context("Failed to parse JSON config")?
    };

    config.validate()?;
    Ok(config)
}
