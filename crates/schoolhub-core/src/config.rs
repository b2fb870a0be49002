//! SchoolHub configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SchoolHubError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolHubConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl SchoolHubConfig {
    /// Load config from `SCHOOLHUB_CONFIG` or the default path
    /// (~/.schoolhub/config.toml), then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with_env(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injected environment lookup.
    pub(crate) fn load_with_env(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = env("SCHOOLHUB_CONFIG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(env);
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchoolHubError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SchoolHubError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// `SRS_SERVER` and `AWS_SERVER` win over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("SRS_SERVER").filter(|v| !v.trim().is_empty()) {
            self.backend.srs_server = url;
        }
        if let Some(url) = env("AWS_SERVER").filter(|v| !v.trim().is_empty()) {
            self.backend.upload_server = url;
        }
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| SchoolHubError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the SchoolHub home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".schoolhub")
    }
}

/// Remote SRS backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_srs_server")]
    pub srs_server: String,
    /// Signed-URL upload service. Kept for completeness; nothing uploads yet.
    #[serde(default)]
    pub upload_server: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_srs_server() -> String { "http://localhost:5000".into() }
fn default_timeout_secs() -> u64 { 15 }
fn default_user_agent() -> String { format!("SchoolHub/{}", env!("CARGO_PKG_VERSION")) }

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            srs_server: default_srs_server(),
            upload_server: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Local gateway (pass-through route handlers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 { 3000 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors_origins: vec![],
        }
    }
}

/// Portal view behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,
    #[serde(default = "default_toast_history")]
    pub toast_history: usize,
}

fn default_debounce_ms() -> u64 { 500 }
fn default_page_limit() -> u64 { 10 }
fn default_toast_history() -> usize { 50 }

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_debounce_ms(),
            page_limit: default_page_limit(),
            toast_history: default_toast_history(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_db")]
    pub db_path: String,
}

fn default_session_db() -> String { "~/.schoolhub/session.db".into() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { db_path: default_session_db() }
    }
}
