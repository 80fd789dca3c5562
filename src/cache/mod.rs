//! Cached post set
//!
//! Wraps a [`ContentRepository`] and keeps the parsed post set in memory for
//! a bounded time. Only file contents are cached: publish state, tag filters
//! and ordering are evaluated on every call against the supplied instant, so
//! a scheduled post appears on time whether or not the cache is warm.
//!
//! Population is single-flight: the entry lock is held while the set is
//! rebuilt, so concurrent callers wait for one reload instead of each
//! scanning the directory.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::content::loader::{filter_by_tag, select_posts};
use crate::content::{ContentRepository, Post, PreviewSummary};

/// Default staleness bound
pub const DEFAULT_TTL_SECS: u64 = 60;

/// One loaded post set
#[derive(Debug)]
struct CacheEntry {
    /// When the set was read from disk
    loaded_at: DateTime<Utc>,
    posts: Arc<Vec<Post>>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A clock that went backwards also counts as stale
        now >= self.loaded_at && now - self.loaded_at < ttl
    }
}

/// TTL-bounded cache in front of a [`ContentRepository`]
#[derive(Debug)]
pub struct CachedRepository {
    repository: ContentRepository,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl CachedRepository {
    /// A `ttl` of zero turns caching off
    pub fn new(repository: ContentRepository, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        Self {
            repository,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Same contract as [`ContentRepository::list_posts`]
    pub fn list_posts(&self, include_unpublished: bool, now: DateTime<Utc>) -> Vec<Post> {
        let posts = self.posts(now);
        select_posts(posts.as_ref().clone(), include_unpublished, now)
    }

    /// Same contract as [`ContentRepository::list_posts_by_tag`]
    pub fn list_posts_by_tag(&self, tag: &str, now: DateTime<Utc>) -> Vec<Post> {
        filter_by_tag(self.list_posts(false, now), tag)
    }

    /// Same contract as [`ContentRepository::get_by_slug`]
    pub fn get_by_slug(&self, slug: &str, now: DateTime<Utc>) -> Option<Post> {
        self.posts(now).iter().find(|post| post.slug == slug).cloned()
    }

    /// Same contract as [`ContentRepository::preview`]
    pub fn preview(&self, now: DateTime<Utc>) -> PreviewSummary {
        PreviewSummary::classify(self.list_posts(true, now), now)
    }

    /// Drop the cached set; the next call reloads from disk
    pub fn invalidate(&self) {
        *self.lock() = None;
        tracing::debug!("Post cache invalidated");
    }

    /// The full post set, reloading it if it is missing or older than the TTL
    fn posts(&self, now: DateTime<Utc>) -> Arc<Vec<Post>> {
        if self.ttl.is_zero() {
            return Arc::new(self.repository.list_posts(true, now));
        }

        let mut entry = self.lock();
        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(now, self.ttl) {
                return Arc::clone(&cached.posts);
            }
        }

        let posts = Arc::new(self.repository.list_posts(true, now));
        tracing::debug!(
            "Loaded {} posts from {:?}",
            posts.len(),
            self.repository.content_dir()
        );
        *entry = Some(CacheEntry {
            loaded_at: now,
            posts: Arc::clone(&posts),
        });
        posts
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // The entry is only ever replaced whole, so a poisoned lock still holds valid data
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn write_post(dir: &TempDir, slug: &str, title: &str, date: &str) {
        let content = format!("---\ntitle: {}\ndate: {}\ntags: [news]\n---\nBody\n", title, date);
        fs::write(dir.path().join(format!("{}.md", slug)), content).unwrap();
    }

    fn cached(dir: &TempDir, ttl_secs: u64) -> CachedRepository {
        CachedRepository::new(
            ContentRepository::new(dir.path()),
            std::time::Duration::from_secs(ttl_secs),
        )
    }

    #[test]
    fn test_serves_cached_set_within_ttl() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a", "First", "2024-01-01");
        let cache = cached(&dir, DEFAULT_TTL_SECS);

        assert_eq!(cache.get_by_slug("a", t0()).unwrap().title, "First");

        write_post(&dir, "a", "Edited", "2024-01-01");
        let later = t0() + Duration::seconds(59);
        assert_eq!(cache.get_by_slug("a", later).unwrap().title, "First");
    }

    #[test]
    fn test_reloads_after_ttl() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a", "First", "2024-01-01");
        let cache = cached(&dir, DEFAULT_TTL_SECS);
        cache.list_posts(false, t0());

        write_post(&dir, "a", "Edited", "2024-01-01");
        write_post(&dir, "b", "New", "2024-02-01");
        let expired = t0() + Duration::seconds(60);

        let posts = cache.list_posts(false, expired);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].title, "Edited");
    }

    #[test]
    fn test_publish_state_is_not_cached() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "soon", "Soon", "2025-01-01T00:00:30Z");
        let cache = cached(&dir, 3600);

        assert!(cache.list_posts(false, t0()).is_empty());
        assert_eq!(cache.list_posts(true, t0()).len(), 1);

        let due = t0() + Duration::seconds(30);
        assert_eq!(cache.list_posts(false, due).len(), 1);
        assert_eq!(cache.list_posts_by_tag("news", due).len(), 1);
    }

    #[test]
    fn test_get_by_slug_includes_unpublished() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "later", "Later", "2099-01-01");
        let cache = cached(&dir, DEFAULT_TTL_SECS);

        assert!(cache.get_by_slug("later", t0()).is_some());
        assert!(cache.get_by_slug("missing", t0()).is_none());
        assert_eq!(cache.preview(t0()).scheduled.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a", "First", "2024-01-01");
        let cache = cached(&dir, DEFAULT_TTL_SECS);
        cache.list_posts(true, t0());

        write_post(&dir, "a", "Edited", "2024-01-01");
        cache.invalidate();
        assert_eq!(cache.get_by_slug("a", t0()).unwrap().title, "Edited");
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a", "First", "2024-01-01");
        let cache = cached(&dir, 0);
        cache.list_posts(true, t0());

        write_post(&dir, "a", "Edited", "2024-01-01");
        assert_eq!(cache.get_by_slug("a", t0()).unwrap().title, "Edited");
    }

    #[test]
    fn test_clock_going_backwards_reloads() {
        let dir = TempDir::new().unwrap();
        write_post(&dir, "a", "First", "2024-01-01");
        let cache = cached(&dir, DEFAULT_TTL_SECS);
        cache.list_posts(true, t0());

        write_post(&dir, "a", "Edited", "2024-01-01");
        let earlier = t0() - Duration::seconds(1);
        assert_eq!(cache.get_by_slug("a", earlier).unwrap().title, "Edited");
    }

    #[test]
    fn test_concurrent_callers_share_one_load() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write_post(&dir, &format!("p{}", i), "Post", "2024-01-01");
        }
        let cache = Arc::new(cached(&dir, DEFAULT_TTL_SECS));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.posts(t0()))
            })
            .collect();
        let sets: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(sets.iter().all(|set| set.len() == 20));
        assert!(sets.iter().all(|set| Arc::ptr_eq(set, &sets[0])));
    }
}
