//! Content loader - resolves posts from the content directory

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::sort_by_date_desc;
use super::{ContentError, FrontMatter, Post, PostDefaults, PreviewSummary};
use crate::config::SiteConfig;

/// Extensions tried by [`ContentRepository::get_by_slug`], in order
const EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Reads posts straight from disk on every call
#[derive(Debug, Clone)]
pub struct ContentRepository {
    content_dir: PathBuf,
    defaults: PostDefaults,
}

impl ContentRepository {
    /// Create a repository over `content_dir` with the stock defaults
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            defaults: PostDefaults::default(),
        }
    }

    /// Create a repository for a site rooted at `base_dir`
    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: &SiteConfig) -> Self {
        Self {
            content_dir: base_dir.as_ref().join(&config.content_dir),
            defaults: PostDefaults {
                author: config.default_author.clone(),
                words_per_minute: config.words_per_minute,
            },
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// All slugs with a `.md` or `.mdx` file, without duplicates
    pub fn list_slugs(&self) -> Vec<String> {
        if !self.content_dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.content_dir);
            return Vec::new();
        }

        let mut slugs = BTreeSet::new();
        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if let Some(slug) = slug_from_file_name(name) {
                slugs.insert(slug.to_string());
            }
        }

        slugs.into_iter().collect()
    }

    /// Resolve one post. Missing files and read failures both give `None`.
    pub fn get_by_slug(&self, slug: &str, now: DateTime<Utc>) -> Option<Post> {
        let path = self.resolve_path(slug)?;
        match self.load_post(slug, &path, now) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Failed to load post {}: {:#}", slug, anyhow::Error::new(e));
                None
            }
        }
    }

    /// Posts sorted newest first, published ones only unless
    /// `include_unpublished` is set
    pub fn list_posts(&self, include_unpublished: bool, now: DateTime<Utc>) -> Vec<Post> {
        let posts = self
            .list_slugs()
            .iter()
            .filter_map(|slug| self.get_by_slug(slug, now))
            .collect();
        select_posts(posts, include_unpublished, now)
    }

    /// Published posts carrying `tag`
    pub fn list_posts_by_tag(&self, tag: &str, now: DateTime<Utc>) -> Vec<Post> {
        filter_by_tag(self.list_posts(false, now), tag)
    }

    /// Every post, bucketed for the preview dashboard
    pub fn preview(&self, now: DateTime<Utc>) -> PreviewSummary {
        PreviewSummary::classify(self.list_posts(true, now), now)
    }

    /// The `.md` file if present, else the `.mdx` one
    fn resolve_path(&self, slug: &str) -> Option<PathBuf> {
        if !is_safe_slug(slug) {
            tracing::debug!("Rejected slug {:?}", slug);
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.content_dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }

    /// Load a single post from a file
    fn load_post(&self, slug: &str, path: &Path, now: DateTime<Utc>) -> Result<Post, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Post::from_front_matter(slug, fm, body, &self.defaults, now))
    }
}

/// Apply the publish filter and date ordering to a loaded post set
pub(crate) fn select_posts(
    mut posts: Vec<Post>,
    include_unpublished: bool,
    now: DateTime<Utc>,
) -> Vec<Post> {
    if !include_unpublished {
        posts.retain(|post| post.is_published(now));
    }
    sort_by_date_desc(&mut posts);
    posts
}

pub(crate) fn filter_by_tag(mut posts: Vec<Post>, tag: &str) -> Vec<Post> {
    posts.retain(|post| post.has_tag(tag));
    posts
}

/// Strip a markdown extension from a file name
fn slug_from_file_name(name: &str) -> Option<&str> {
    EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext)?.strip_suffix('.'))
        .filter(|slug| !slug.is_empty())
}

/// Slugs come from URLs, so keep them inside the content directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
