use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address the dashboard listens on
    #[serde(default = "default_listen")]
    pub listen: String,
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Extra or overriding vendor display names, keyed by vendor id
    #[serde(default)]
    pub platforms: HashMap<String, String>,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: u32,
    /// How many hot keywords feed the merged keyword modal
    #[serde(default = "default_top_keywords")]
    pub top_keywords: u32,
    /// Articles shown per vendor section in the grouped view
    #[serde(default = "default_group_preview")]
    pub group_preview: usize,
}

fn default_per_page() -> u32 {
    1000
}

fn default_keyword_limit() -> u32 {
    50
}

fn default_top_keywords() -> u32 {
    5
}

fn default_group_preview() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            keyword_limit: default_keyword_limit(),
            top_keywords: default_top_keywords(),
            group_preview: default_group_preview(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
