use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::Result;
use crate::paths::Paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    /// Width of the injected panel host, in CSS pixels.
    #[serde(default = "default_panel_width")]
    pub panel_width: f64,
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    720.0
}

fn default_panel_width() -> f64 {
    300.0
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            panel_width: default_panel_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_login_url() -> String {
    "http://localhost:3000/extension/login".to_string()
}

fn default_verify_url() -> String {
    "http://localhost:3000/api/verify".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            verify_url: default_verify_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Origin prefixes the inspector is permitted to activate on.
    #[serde(default = "default_allowed_urls")]
    pub allowed_urls: Vec<String>,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_allowed_urls() -> Vec<String> {
    vec!["https://github.com/".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_urls: default_allowed_urls(),
            page: PageConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Allow-list predicate. URLs are normalized before the prefix match so
    /// `https://github.com` and `https://github.com/` compare equal.
    pub fn is_allowed_url(&self, page_url: &str) -> bool {
        let href = Url::parse(page_url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| page_url.to_string());
        self.allowed_urls.iter().any(|prefix| href.starts_with(prefix))
    }
}
