//! Application configuration
//!
//! Loaded from `sonatina.toml` in the platform config directory, or from the
//! path in `SONATINA_CONFIG`. The API token is only ever read from
//! `SONATINA_TOKEN`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sonatina_net::notify::ATTENDANCE_TOPIC_MARKER;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const CONFIG_ENV: &str = "SONATINA_CONFIG";
pub const TOKEN_ENV: &str = "SONATINA_TOKEN";
const CONFIG_FILE: &str = "sonatina.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub account: AccountConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Gateway address; no push feed when absent
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            addr: None,
            topics: default_topics(),
        }
    }
}

impl PushConfig {
    pub fn socket_addr(&self) -> Result<Option<SocketAddr>> {
        self.addr
            .as_deref()
            .map(|addr| {
                addr.parse::<SocketAddr>()
                    .map_err(|e| Error::Config(format!("push.addr {:?}: {}", addr, e)))
            })
            .transpose()
    }
}

/// Which portal the signed-in account uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalRole {
    #[default]
    Student,
    Teacher,
    Staff,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub role: PortalRole,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_topics() -> Vec<String> {
    vec![ATTENDANCE_TOPIC_MARKER.to_string()]
}

impl AppConfig {
    /// Load from `SONATINA_CONFIG` or the default location
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::default_path()?,
        };
        Self::load_from(&path)
    }

    /// A missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("edu", "sonatina", "sonatina")
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be positive".into()));
        }
        self.push.socket_addr()?;
        Ok(())
    }

    pub fn token_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty())
    }
}
