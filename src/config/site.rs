//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Content
    pub content_dir: String,
    pub default_author: String,
    pub words_per_minute: usize,

    // Caching (seconds, 0 disables)
    pub cache_ttl_secs: u64,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "ekkOS Blog".to_string(),
            description: String::new(),

            content_dir: "content".to_string(),
            default_author: "ekkOS Team".to_string(),
            words_per_minute: 200,

            cache_ttl_secs: 60,

            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `_config.yml` from a base directory, falling back to defaults
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}
