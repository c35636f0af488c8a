//! Configuration loading and management.
//!
//! Configuration comes from, lowest priority first: built-in defaults,
//! a YAML config file (`./taskdeck.yaml`, then `~/.taskdeck/config.yaml`),
//! environment variables, and finally CLI flags applied by `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the HTTP API.
pub const DEFAULT_PORT: u16 = 5001;

/// Placeholder secret; serving with it logs a warning.
pub const DEFAULT_JWT_SECRET: &str = "change-me-jwt-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Port the HTTP API listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Secret used to sign session tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            port: default_port(),
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".taskdeck").join("taskdeck.db"))
        .unwrap_or_else(|| PathBuf::from("taskdeck.db"))
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_secs() -> i64 {
    crate::auth::DEFAULT_TOKEN_TTL_SECS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration, optionally from an explicit file path.
    ///
    /// Without an explicit path, the first of `./taskdeck.yaml` and
    /// `~/.taskdeck/config.yaml` that exists is used; defaults apply when
    /// neither does. Environment variables override file values.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => Self::discover()?,
        };
        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn discover() -> Result<Self> {
        let project = PathBuf::from("taskdeck.yaml");
        if project.exists() {
            return Self::from_file(&project);
        }
        if let Some(home) = dirs::home_dir() {
            let user = home.join(".taskdeck").join("config.yaml");
            if user.exists() {
                return Self::from_file(&user);
            }
        }
        Ok(Self::default())
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("TASKDECK_DB_PATH") {
            self.server.db_path = PathBuf::from(path);
        }
        if let Ok(port) = std::env::var("TASKDECK_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(secret) = std::env::var("TASKDECK_JWT_SECRET") {
            self.server.jwt_secret = secret;
        }
    }

    /// Ensure the database file's parent directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
