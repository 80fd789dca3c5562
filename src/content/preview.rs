//! Preview dashboard data: every post bucketed by publish status

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Post, PostStatus};

/// Drafts, scheduled and published posts at one instant
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewSummary {
    pub drafts: Vec<Post>,
    pub scheduled: Vec<Post>,
    pub published: Vec<Post>,
}

impl PreviewSummary {
    /// Split `posts` by [`Post::status`] at `now`, keeping their order
    pub fn classify(posts: Vec<Post>, now: DateTime<Utc>) -> Self {
        let mut summary = Self::default();
        for post in posts {
            match post.status(now) {
                PostStatus::Draft => summary.drafts.push(post),
                PostStatus::Scheduled => summary.scheduled.push(post),
                PostStatus::Published => summary.published.push(post),
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.drafts.len() + self.scheduled.len() + self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Buckets in dashboard order
    pub fn sections(&self) -> [(PostStatus, &[Post]); 3] {
        [
            (PostStatus::Draft, self.drafts.as_slice()),
            (PostStatus::Scheduled, self.scheduled.as_slice()),
            (PostStatus::Published, self.published.as_slice()),
        ]
    }
}
