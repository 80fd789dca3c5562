//! Preview dashboard: drafts, scheduled and published posts

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::display_date;
use crate::content::{ContentRepository, PostStatus};
use crate::Blog;

/// Tags shown per post, as on the dashboard cards
const MAX_TAGS: usize = 4;

pub fn run(blog: &Blog) -> Result<()> {
    let repo = blog.repository();
    println!("{}", blog.config.title);
    if !blog.config.description.is_empty() {
        println!("{}", blog.config.description);
    }
    println!();
    for line in render(&repo, Utc::now()) {
        println!("{}", line);
    }
    Ok(())
}

/// Output lines for `preview`
pub fn render(repo: &ContentRepository, now: DateTime<Utc>) -> Vec<String> {
    let summary = repo.preview(now);
    let mut lines = vec![format!(
        "Drafts: {}  Scheduled: {}  Published: {}",
        summary.drafts.len(),
        summary.scheduled.len(),
        summary.published.len()
    )];

    if summary.is_empty() {
        lines.push("No blog posts found.".to_string());
        return lines;
    }

    for (status, posts) in summary.sections() {
        if posts.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{}:", section_title(status)));
        for post in posts {
            let mut line = format!(
                "  {} - {} [{}] {} min",
                display_date(post),
                post.title,
                post.slug,
                post.reading_time
            );
            if !post.tags.is_empty() {
                let tags: Vec<_> = post.tags.iter().take(MAX_TAGS).map(String::as_str).collect();
                line.push_str(&format!(" #{}", tags.join(" #")));
            }
            lines.push(line);
        }
    }

    lines
}

fn section_title(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Draft => "Drafts",
        PostStatus::Scheduled => "Scheduled",
        PostStatus::Published => "Published",
    }
}
