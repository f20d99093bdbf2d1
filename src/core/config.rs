use anyhow::{Result, bail};
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TEXT: &str = "Hi Flask";

pub const MESSAGE_PATH: &str = "/api/message";
pub const ECHO_PATH: &str = "/api/echo";

/// Contents of ~/.echoview/settings.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub default_text: Option<String>,
}

/// Values read from the environment, kept apart so resolution stays testable.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub default_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub base_url: String,
    pub default_text: String,
}

impl Settings {
    /// Load from ~/.echoview/settings.json. Returns None if file missing or invalid.
    pub fn load() -> Option<Self> {
        let path = echoview_config_path("settings.json").ok()?;
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ECHOVIEW_BASE_URL").ok(),
            default_text: std::env::var("ECHOVIEW_TEXT").ok(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_text: DEFAULT_TEXT.to_string(),
        }
    }
}

impl ViewConfig {
    /// Settings file, then env on top of it.
    pub fn load() -> Self {
        Self::resolve(Settings::load(), EnvOverrides::from_env())
    }

    pub fn resolve(settings: Option<Settings>, env: EnvOverrides) -> Self {
        let mut config = Self::default();

        if let Some(settings) = settings {
            if !settings.base_url.is_empty() {
                config.base_url = settings.base_url;
            }
            if let Some(text) = settings.default_text {
                config.default_text = text;
            }
        }

        if let Some(base_url) = env.base_url.filter(|s| !s.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(text) = env.default_text {
            config.default_text = text;
        }

        config
    }

    /// Apply command-line flags, which win over everything else.
    pub fn with_overrides(mut self, base_url: Option<String>, text: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|s| !s.is_empty()) {
            self.base_url = base_url;
        }
        if let Some(text) = text {
            self.default_text = text;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base url '{}': {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base url '{}' must use http or https", self.base_url);
        }
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub fn echoview_config_path(filename: &str) -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
    Ok(home.join(".echoview").join(filename))
}
