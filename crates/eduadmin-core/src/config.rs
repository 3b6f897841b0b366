use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const BASE_URL_ENV: &str = "EDUADMIN_BASE_URL";

/// Client configuration that can be loaded from a JSON file.
/// Every field is optional; missing values fall back to the platform defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Root URL of the platform server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Raw `Cookie` value carrying an authenticated admin session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Delay between a successful admin action and the view refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_delay_ms: Option<u64>,

    /// Delay between a successful form submission and the view refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_reload_delay_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_lifetime_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_interval_ms: Option<u64>,
}

impl ClientConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize config")
    }

    /// Load from an explicit path, else the per-user config file if it exists, else defaults.
    /// `EDUADMIN_BASE_URL` wins over whatever the file says.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = Some(url);
            }
        }

        Ok(config)
    }

    /// `<config dir>/eduadmin/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("eduadmin").join("config.json"))
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms.unwrap_or(1000))
    }

    pub fn form_reload_delay(&self) -> Duration {
        Duration::from_millis(self.form_reload_delay_ms.unwrap_or(1500))
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_lifetime_ms.unwrap_or(5000))
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms.unwrap_or(30_000))
    }
}
