use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub debug: bool,
    /// Root URL of the application, used as the redirect target for empty
    /// search queries. Must begin with `/`.
    #[serde(default = "default_app_url_root")]
    pub app_url_root: String,
    pub server: ServerConfig,
    pub db: DbConfig,
    pub search: SearchConfig,
    pub media: MediaConfig,
    pub templates: TemplatesConfig,
    /// Arbitrary extra settings. Only keys named in
    /// `templates.settings_keys` are exposed to templates.
    #[serde(default)]
    pub settings: HashMap<String, toml::Value>,
}

fn default_app_url_root() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Base URL of the Solr core, e.g. `http://localhost:8983/solr/stackdump`.
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplatesConfig {
    pub root: PathBuf,
    /// Allow-list of `[settings]` keys made visible to templates.
    #[serde(default)]
    pub settings_keys: Vec<String>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if !config.app_url_root.starts_with('/') {
        anyhow::bail!("app_url_root must begin with '/'");
    }

    url::Url::parse(&config.search.url)
        .with_context(|| format!("search.url is not a valid URL: {}", config.search.url))?;

    if config.search.timeout_secs == 0 {
        anyhow::bail!("search.timeout_secs must be > 0");
    }

    Ok(config)
}
