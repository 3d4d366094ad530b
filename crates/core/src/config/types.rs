use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::deploy::DeployConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub artifacts: ArtifactsConfig,
    pub deploy: DeployConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    pub port: u16,
    /// Serve HTTPS when present
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

/// PEM certificate and private key for HTTPS
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Authentication configuration.
///
/// The token is usually supplied through the `API_TOKEN` environment
/// variable. An empty or missing token disables authentication.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthConfig {
    /// The configured token, if it is non-empty
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Where artifact files are written
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    pub data_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append logs to this file instead of stdout
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Sanitized config for logging and hashing (token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub auth: SanitizedAuthConfig,
    pub database: DatabaseConfig,
    pub artifacts: ArtifactsConfig,
    pub deploy: DeployConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            auth: SanitizedAuthConfig {
                token_configured: config.auth.token().is_some(),
            },
            database: config.database.clone(),
            artifacts: config.artifacts.clone(),
            deploy: config.deploy.clone(),
            logging: config.logging.clone(),
        }
    }
}
