//! ekkos-blog: markdown blog content engine
//!
//! Reads posts with YAML front-matter from a content directory, decides
//! which of them are visible at a given instant (drafts and scheduled
//! posts stay hidden), and serves the listings, per-post pages and the
//! preview dashboard from the command line or over HTTP.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A blog rooted at a base directory
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the `.md`/`.mdx` posts
    pub content_dir: PathBuf,
}

impl Blog {
    /// Open a blog, reading `_config.yml` from `base_dir` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(&base_dir)?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Open a blog with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Uncached reader over the content directory
    pub fn repository(&self) -> content::ContentRepository {
        content::ContentRepository::from_config(&self.base_dir, &self.config)
    }

    /// Reader that keeps the post set for `cache_ttl_secs`
    pub fn cached_repository(&self) -> cache::CachedRepository {
        cache::CachedRepository::new(
            self.repository(),
            Duration::from_secs(self.config.cache_ttl_secs),
        )
    }
}
