//! List blog content

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::display_date;
use crate::content::{ContentRepository, Post};
use crate::Blog;

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str, tag: Option<&str>) -> Result<()> {
    let repo = blog.repository();
    for line in render(&repo, content_type, tag, Utc::now())? {
        println!("{}", line);
    }
    Ok(())
}

/// Output lines for `list`
pub fn render(
    repo: &ContentRepository,
    content_type: &str,
    tag: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts = match tag {
                Some(tag) => repo.list_posts_by_tag(tag, now),
                None => repo.list_posts(false, now),
            };
            lines.push(format!("Posts ({}):", posts.len()));
            lines.extend(posts.iter().map(post_line));
        }
        "all" => {
            let mut posts = repo.list_posts(true, now);
            if let Some(tag) = tag {
                posts.retain(|post| post.has_tag(tag));
            }
            lines.push(format!("All posts ({}):", posts.len()));
            lines.extend(posts.iter().map(|post| {
                format!("{} ({})", post_line(post), post.status(now).as_str())
            }));
        }
        "tag" | "tags" => {
            let mut tags: HashMap<String, usize> = HashMap::new();
            for post in repo.list_posts(false, now) {
                for tag in post.tags {
                    *tags.entry(tag).or_insert(0) += 1;
                }
            }
            lines.push(format!("Tags ({}):", tags.len()));
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            lines.extend(
                tags.into_iter()
                    .map(|(tag, count)| format!("  {} ({})", tag, count)),
            );
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, all, tag",
                content_type
            );
        }
    }

    Ok(lines)
}

fn post_line(post: &Post) -> String {
    format!("  {} - {} [{}]", display_date(post), post.title, post.slug)
}
